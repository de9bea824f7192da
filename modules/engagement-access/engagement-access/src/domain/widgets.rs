//! Drag-and-drop widget ordering.

use engagement_access_sdk::{Widget, WidgetSortEntry};

use super::error::DomainError;

/// Move the widget at display position `from` to position `to`.
///
/// Positions are zero-based over the widgets sorted by `sort_index`. The
/// result carries contiguous `sort_index` values starting at 1.
///
/// # Errors
///
/// `PositionOutOfRange` if either position is past the end.
pub fn reorder(widgets: &[Widget], from: usize, to: usize) -> Result<Vec<Widget>, DomainError> {
    let len = widgets.len();
    for position in [from, to] {
        if position >= len {
            return Err(DomainError::PositionOutOfRange { position, len });
        }
    }

    let mut ordered = widgets.to_vec();
    ordered.sort_by_key(|w| (w.sort_index, w.id));
    let moved = ordered.remove(from);
    ordered.insert(to, moved);

    for (widget, index) in ordered.iter_mut().zip(1u32..) {
        widget.sort_index = index;
    }
    Ok(ordered)
}

/// Payload for persisting an order.
#[must_use]
pub fn sort_entries(widgets: &[Widget]) -> Vec<WidgetSortEntry> {
    widgets
        .iter()
        .map(|w| WidgetSortEntry {
            id: w.id,
            sort_index: w.sort_index,
        })
        .collect()
}
