//! Drop indicator selection

use crate::types::ColumnId;
use serde::{Deserialize, Serialize};

/// Default vertical bias, in pixels, added to every indicator's top edge
pub const DISTANCE_OFFSET: f64 = 50.0;

/// An insertion slot.
///
/// `before` names the item the slot sits in front of; `None` marks the
/// trailing sentinel (end of list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator<Id> {
    pub before: Option<Id>,
    /// Column the slot belongs to; `None` for column-reorder slots
    pub column: Option<ColumnId>,
    /// Top edge of the slot in pointer coordinates
    pub top: f64,
}

impl<Id> Indicator<Id> {
    /// Slot in front of `id`
    pub fn before(id: Id, column: Option<ColumnId>, top: f64) -> Self {
        Self {
            before: Some(id),
            column,
            top,
        }
    }

    /// End-of-list slot
    pub fn sentinel(column: Option<ColumnId>, top: f64) -> Self {
        Self {
            before: None,
            column,
            top,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.before.is_none()
    }
}

/// Pick the indicator a drop at `pointer_y` lands on.
///
/// For each slot `offset = pointer_y - (top + distance_offset)`. Among slots
/// with a negative offset the one closest to zero wins; on a tie the later
/// slot wins. With no candidate the last slot (the sentinel) is chosen.
/// Returns `None` only for an empty slice.
pub fn nearest_indicator<Id>(
    indicators: &[Indicator<Id>],
    pointer_y: f64,
    distance_offset: f64,
) -> Option<&Indicator<Id>> {
    indicators
        .iter()
        .fold(None, |best: Option<(f64, &Indicator<Id>)>, indicator| {
            let offset = pointer_y - (indicator.top + distance_offset);
            match best {
                _ if offset >= 0.0 => best,
                Some((closest, _)) if offset < closest => best,
                _ => Some((offset, indicator)),
            }
        })
        .map(|(_, indicator)| indicator)
        .or_else(|| indicators.last())
}
