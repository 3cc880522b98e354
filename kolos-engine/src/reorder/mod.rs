//! Drag-and-drop reordering
//!
//! Every card (or column) renders an invisible indicator slot before itself,
//! and each list ends with a sentinel slot. While dragging,
//! [`nearest_indicator`] picks the slot under the pointer; nothing is
//! written. On drop, [`DragSession`] splices the dragged item into the local
//! order and yields a [`ReorderPlan`], which [`BoardCache`] applies locally
//! first and then persists.

mod cache;
mod drag;
mod indicator;

pub use cache::BoardCache;
pub use drag::{
    apply_card_drop, apply_column_drop, Card, CardDrag, ColumnDrag, DragSession, DropOutcome,
    ReorderPlan,
};
pub use indicator::{nearest_indicator, Indicator, DISTANCE_OFFSET};
