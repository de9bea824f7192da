use std::collections::BTreeSet;
use std::fmt;

/// A role string assigned to a user by the identity provider.
///
/// Roles are opaque: they are only ever compared for equality against
/// scopes, never parsed or ordered by privilege.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A permission string a route or action demands from the current user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Flat set of roles held by a user. No hierarchy is modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: impl Into<Role>) -> bool {
        self.0.insert(role.into())
    }

    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.as_str() == role)
    }

    /// True if at least one held role is literally equal to one of `scopes`.
    #[must_use]
    pub fn intersects<'a, I>(&self, scopes: I) -> bool
    where
        I: IntoIterator<Item = &'a Scope>,
    {
        scopes.into_iter().any(|scope| self.contains(scope.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

impl<R: Into<Role>> FromIterator<R> for RoleSet {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = std::collections::btree_set::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn intersects_matches_exact_strings_only() {
        let roles: RoleSet = ["VIEWER", "create_engagement"].into_iter().collect();

        assert!(roles.intersects(&[Scope::new("create_engagement")]));
        assert!(!roles.intersects(&[Scope::new("ADMIN")]));
        assert!(!roles.intersects(&[Scope::new("viewer")]));
    }

    #[test]
    fn empty_scopes_never_intersect() {
        let roles: RoleSet = ["ADMIN"].into_iter().collect();
        let none: [Scope; 0] = [];
        assert!(!roles.intersects(&none));
    }

    #[test]
    fn duplicates_collapse() {
        let roles: RoleSet = ["ADMIN", "ADMIN"].into_iter().collect();
        assert_eq!(roles.len(), 1);
    }
}
