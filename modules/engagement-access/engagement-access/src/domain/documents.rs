//! Flat document list to folder tree.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use engagement_access_sdk::{Document, DocumentKind, DocumentNode};

/// Assemble the folder tree of a documents widget.
///
/// Documents whose parent is missing attach at the root, as do members of a
/// parent cycle and subtrees nested deeper than 64 levels. Siblings are
/// ordered folders first, then by title.
#[must_use]
pub fn build_document_tree(documents: Vec<Document>) -> Vec<DocumentNode> {
    let ids: HashSet<i64> = documents.iter().map(|d| d.id).collect();
    let mut children: HashMap<i64, Vec<Document>> = HashMap::new();
    let mut roots = Vec::new();

    for document in documents {
        match document.parent_id {
            Some(parent) if parent != document.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(document);
            }
            _ => roots.push(document),
        }
    }

    let mut tree = attach_all(roots, &mut children);

    // Whatever is left hangs off a cycle that never reaches a root.
    tree.extend(
        children
            .into_values()
            .flatten()
            .map(|document| DocumentNode {
                document,
                children: Vec::new(),
            }),
    );

    sort_level(&mut tree);
    tree
}

/// Nesting deeper than this restarts at the root.
const MAX_DEPTH: usize = 64;

struct Frame {
    document: Document,
    pending: Vec<Document>,
    built: Vec<DocumentNode>,
}

impl Frame {
    fn open(document: Document, children: &mut HashMap<i64, Vec<Document>>) -> Self {
        let pending = children.remove(&document.id).unwrap_or_default();
        Self {
            document,
            pending,
            built: Vec::new(),
        }
    }

    fn close(mut self) -> DocumentNode {
        sort_level(&mut self.built);
        DocumentNode {
            document: self.document,
            children: self.built,
        }
    }
}

fn attach_all(
    roots: Vec<Document>,
    children: &mut HashMap<i64, Vec<Document>>,
) -> Vec<DocumentNode> {
    let mut forest = Vec::with_capacity(roots.len());
    let mut queue = roots;

    while let Some(root) = queue.pop() {
        let mut stack = vec![Frame::open(root, children)];
        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.pending.pop() {
                if stack.len() >= MAX_DEPTH {
                    queue.push(child);
                } else {
                    let next = Frame::open(child, children);
                    stack.push(next);
                }
            } else if let Some(done) = stack.pop() {
                let node = done.close();
                match stack.last_mut() {
                    Some(parent) => parent.built.push(node),
                    None => forest.push(node),
                }
            }
        }
    }
    forest
}

fn sort_level(nodes: &mut [DocumentNode]) {
    nodes.sort_by(|a, b| compare(&a.document, &b.document));
}

fn compare(a: &Document, b: &Document) -> Ordering {
    let rank = |d: &Document| match d.kind {
        DocumentKind::Folder => 0,
        DocumentKind::File => 1,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn doc(id: i64, parent_id: Option<i64>, title: &str, kind: DocumentKind) -> Document {
        Document {
            id,
            parent_id,
            title: title.to_owned(),
            kind,
            url: None,
        }
    }

    fn titles(nodes: &[DocumentNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.document.title.as_str()).collect()
    }

    #[test]
    fn nests_children_under_folders() {
        let tree = build_document_tree(vec![
            doc(1, None, "Reports", DocumentKind::Folder),
            doc(2, Some(1), "2025.pdf", DocumentKind::File),
            doc(3, Some(1), "Drafts", DocumentKind::Folder),
            doc(4, Some(3), "draft.pdf", DocumentKind::File),
            doc(5, None, "agenda.pdf", DocumentKind::File),
        ]);

        assert_eq!(titles(&tree), vec!["Reports", "agenda.pdf"]);
        assert_eq!(titles(&tree[0].children), vec!["Drafts", "2025.pdf"]);
        assert_eq!(titles(&tree[0].children[0].children), vec!["draft.pdf"]);
    }

    #[test]
    fn unknown_parent_goes_to_root() {
        let tree = build_document_tree(vec![
            doc(1, Some(99), "lost.pdf", DocumentKind::File),
            doc(2, None, "b.pdf", DocumentKind::File),
        ]);
        assert_eq!(titles(&tree), vec!["b.pdf", "lost.pdf"]);
    }

    #[test]
    fn cycles_do_not_lose_documents() {
        let tree = build_document_tree(vec![
            doc(1, Some(2), "a", DocumentKind::Folder),
            doc(2, Some(1), "b", DocumentKind::Folder),
            doc(3, Some(3), "self", DocumentKind::File),
        ]);
        assert_eq!(titles(&tree), vec!["a", "b", "self"]);
    }

    fn depth(node: &DocumentNode) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(node, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    fn count(nodes: &[DocumentNode]) -> usize {
        let mut total = 0;
        let mut stack: Vec<&DocumentNode> = nodes.iter().collect();
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }

    #[test]
    fn deep_folder_chains_are_capped() {
        let chain: Vec<Document> = (0..200)
            .map(|id| {
                let parent = (id > 0).then_some(id - 1);
                doc(id, parent, &format!("f{id:03}"), DocumentKind::Folder)
            })
            .collect();

        let tree = build_document_tree(chain);

        assert_eq!(count(&tree), 200);
        assert_eq!(titles(&tree), vec!["f000", "f064", "f128", "f192"]);
        assert_eq!(depth(&tree[0]), MAX_DEPTH);
        assert!(tree.iter().all(|root| depth(root) <= MAX_DEPTH));
    }
}
