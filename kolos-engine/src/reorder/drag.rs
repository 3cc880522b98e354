//! Drag sessions and the splice applied on drop

use super::indicator::{nearest_indicator, Indicator};
use crate::types::{ColumnId, TaskId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A card's slot in a board's canonical task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: TaskId,
    pub column: ColumnId,
}

/// What a drop asks the cache to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReorderPlan {
    Cards {
        task: TaskId,
        /// Set when the card crossed into another column
        column: Option<ColumnId>,
        /// Full canonical order for the board
        order: Vec<TaskId>,
    },
    Columns {
        order: Vec<ColumnId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Nothing moved
    NoOp,
    Reorder(ReorderPlan),
}

/// Move `dragged` in front of `before` (or to the end for `None`), setting
/// its column to `target_column`.
///
/// Returns `None` when nothing would change: `before` is the dragged card
/// itself, an unknown id is involved, or the resulting list equals the input.
pub fn apply_card_drop(
    cards: &[Card],
    dragged: &TaskId,
    target_column: &ColumnId,
    before: Option<&TaskId>,
) -> Option<Vec<Card>> {
    if before == Some(dragged) {
        return None;
    }

    let mut moving = cards.iter().find(|c| &c.id == dragged)?.clone();
    moving.column = target_column.clone();

    let mut result: Vec<Card> = cards.iter().filter(|c| &c.id != dragged).cloned().collect();
    splice(&mut result, moving, |c| Some(&c.id) == before, before.is_some())?;

    (result != cards).then_some(result)
}

/// Move column `dragged` in front of `before` (or to the end for `None`)
pub fn apply_column_drop(
    columns: &[ColumnId],
    dragged: &ColumnId,
    before: Option<&ColumnId>,
) -> Option<Vec<ColumnId>> {
    if before == Some(dragged) || !columns.contains(dragged) {
        return None;
    }

    let mut result: Vec<ColumnId> = columns.iter().filter(|c| *c != dragged).cloned().collect();
    splice(&mut result, dragged.clone(), |c| Some(c) == before, before.is_some())?;

    (result != columns).then_some(result)
}

fn splice<T>(
    list: &mut Vec<T>,
    item: T,
    is_anchor: impl Fn(&T) -> bool,
    anchored: bool,
) -> Option<()> {
    if anchored {
        let index = list.iter().position(is_anchor)?;
        list.insert(index, item);
    } else {
        list.push(item);
    }
    Some(())
}

/// One drag gesture, from pickup to drop.
///
/// Hovering only moves the highlight; nothing is written until
/// [`drop`](DragSession::drop) turns the last highlighted slot into a plan.
#[derive(Debug, Clone)]
pub struct DragSession<Id> {
    dragged: Id,
    distance_offset: f64,
    over_column: Option<ColumnId>,
    highlighted: Option<Indicator<Id>>,
}

/// Dragging a card between and within columns
pub type CardDrag = DragSession<TaskId>;

/// Dragging a column along a board
pub type ColumnDrag = DragSession<ColumnId>;

impl<Id: Clone + std::fmt::Display> DragSession<Id> {
    pub fn start(dragged: Id, distance_offset: f64) -> Self {
        trace!(%dragged, "drag started");
        Self {
            dragged,
            distance_offset,
            over_column: None,
            highlighted: None,
        }
    }

    pub fn dragged(&self) -> &Id {
        &self.dragged
    }

    /// Pointer moved over `column` (`None` for the board itself when
    /// dragging columns). Returns the slot to highlight.
    pub fn drag_over(
        &mut self,
        column: Option<ColumnId>,
        indicators: &[Indicator<Id>],
        pointer_y: f64,
    ) -> Option<&Indicator<Id>> {
        self.over_column = column;
        self.highlighted = nearest_indicator(indicators, pointer_y, self.distance_offset).cloned();
        self.highlighted.as_ref()
    }

    /// Pointer left the drop area
    pub fn drag_leave(&mut self) {
        self.over_column = None;
        self.highlighted = None;
    }

    pub fn highlighted(&self) -> Option<&Indicator<Id>> {
        self.highlighted.as_ref()
    }
}

impl DragSession<TaskId> {
    /// Finish a card drag against the board's current cards
    pub fn drop(self, cards: &[Card]) -> DropOutcome {
        let (Some(column), Some(slot)) = (self.over_column, self.highlighted) else {
            return DropOutcome::NoOp;
        };

        let Some(reordered) = apply_card_drop(cards, &self.dragged, &column, slot.before.as_ref())
        else {
            return DropOutcome::NoOp;
        };

        let moved_column = cards
            .iter()
            .find(|c| c.id == self.dragged)
            .filter(|c| c.column != column)
            .map(|_| column);
        debug!(task = %self.dragged, crossed = moved_column.is_some(), "card dropped");

        DropOutcome::Reorder(ReorderPlan::Cards {
            task: self.dragged,
            column: moved_column,
            order: reordered.into_iter().map(|c| c.id).collect(),
        })
    }
}

impl DragSession<ColumnId> {
    /// Finish a column drag against the board's current column order
    pub fn drop(self, columns: &[ColumnId]) -> DropOutcome {
        let Some(slot) = self.highlighted else {
            return DropOutcome::NoOp;
        };

        match apply_column_drop(columns, &self.dragged, slot.before.as_ref()) {
            Some(order) => {
                debug!(column = %self.dragged, "column dropped");
                DropOutcome::Reorder(ReorderPlan::Columns { order })
            }
            None => DropOutcome::NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::DISTANCE_OFFSET;

    fn card(id: &str, column: &str) -> Card {
        Card {
            id: TaskId::from_string(id),
            column: ColumnId::from_string(column),
        }
    }

    fn ids(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    fn tid(id: &str) -> TaskId {
        TaskId::from_string(id)
    }

    fn cid(id: &str) -> ColumnId {
        ColumnId::from_string(id)
    }

    #[test]
    fn test_cross_column_drop_before_card() {
        let cards = vec![card("t1", "todo"), card("t2", "todo"), card("t3", "done")];
        let result = apply_card_drop(&cards, &tid("t3"), &cid("todo"), Some(&tid("t2"))).unwrap();
        assert_eq!(ids(&result), ["t1", "t3", "t2"]);
        assert_eq!(result[1].column, cid("todo"));
    }

    #[test]
    fn test_drop_on_sentinel_moves_to_end() {
        let cards = vec![card("t1", "todo"), card("t2", "todo"), card("t3", "todo")];
        let result = apply_card_drop(&cards, &tid("t1"), &cid("todo"), None).unwrap();
        assert_eq!(ids(&result), ["t2", "t3", "t1"]);
    }

    #[test]
    fn test_drop_on_own_slot_is_noop() {
        let cards = vec![card("t1", "todo"), card("t2", "todo")];
        assert!(apply_card_drop(&cards, &tid("t2"), &cid("todo"), Some(&tid("t2"))).is_none());
        // The slot after a card is the same position too
        assert!(apply_card_drop(&cards, &tid("t1"), &cid("todo"), Some(&tid("t2"))).is_none());
    }

    #[test]
    fn test_unknown_ids_are_noop() {
        let cards = vec![card("t1", "todo")];
        assert!(apply_card_drop(&cards, &tid("zz"), &cid("todo"), None).is_none());
        assert!(apply_card_drop(&cards, &tid("t1"), &cid("todo"), Some(&tid("zz"))).is_none());
    }

    #[test]
    fn test_cross_column_to_end_keeps_order_but_changes_column() {
        let cards = vec![card("t1", "todo"), card("t2", "done")];
        let result = apply_card_drop(&cards, &tid("t2"), &cid("todo"), None).unwrap();
        assert_eq!(ids(&result), ["t1", "t2"]);
        assert_eq!(result[1].column, cid("todo"));
    }

    #[test]
    fn test_column_drop() {
        let columns = vec![cid("a"), cid("b"), cid("c")];
        assert_eq!(
            apply_column_drop(&columns, &cid("c"), Some(&cid("a"))).unwrap(),
            vec![cid("c"), cid("a"), cid("b")]
        );
        assert!(apply_column_drop(&columns, &cid("a"), Some(&cid("a"))).is_none());
        assert!(apply_column_drop(&columns, &cid("c"), None).is_none());
    }

    #[test]
    fn test_card_session_produces_plan_only_on_drop() {
        let cards = vec![card("t1", "todo"), card("t2", "todo"), card("t3", "done")];
        let todo = Some(cid("todo"));
        let indicators = vec![
            Indicator::before(tid("t1"), todo.clone(), 0.0),
            Indicator::before(tid("t2"), todo.clone(), 100.0),
            Indicator::sentinel(todo.clone(), 200.0),
        ];

        let mut session = CardDrag::start(tid("t3"), DISTANCE_OFFSET);
        let highlighted = session.drag_over(todo.clone(), &indicators, 120.0).unwrap();
        assert_eq!(highlighted.before, Some(tid("t2")));

        match session.drop(&cards) {
            DropOutcome::Reorder(ReorderPlan::Cards {
                task,
                column,
                order,
            }) => {
                assert_eq!(task, tid("t3"));
                assert_eq!(column, Some(cid("todo")));
                assert_eq!(order, vec![tid("t1"), tid("t3"), tid("t2")]);
            }
            other => panic!("expected a card plan, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_leave_clears_target() {
        let cards = vec![card("t1", "todo"), card("t2", "todo")];
        let indicators = vec![Indicator::sentinel(Some(cid("todo")), 0.0)];

        let mut session = CardDrag::start(tid("t1"), DISTANCE_OFFSET);
        session.drag_over(Some(cid("todo")), &indicators, 10.0);
        session.drag_leave();
        assert!(session.highlighted().is_none());
        assert_eq!(session.drop(&cards), DropOutcome::NoOp);
    }

    #[test]
    fn test_same_column_reorder_has_no_column_change() {
        let cards = vec![card("t1", "todo"), card("t2", "todo")];
        let indicators = vec![
            Indicator::before(tid("t1"), Some(cid("todo")), 0.0),
            Indicator::before(tid("t2"), Some(cid("todo")), 100.0),
            Indicator::sentinel(Some(cid("todo")), 200.0),
        ];
        let mut session = CardDrag::start(tid("t2"), DISTANCE_OFFSET);
        session.drag_over(Some(cid("todo")), &indicators, 10.0);

        assert_eq!(
            session.drop(&cards),
            DropOutcome::Reorder(ReorderPlan::Cards {
                task: tid("t2"),
                column: None,
                order: vec![tid("t2"), tid("t1")],
            })
        );
    }

    #[test]
    fn test_column_session() {
        let columns = vec![cid("a"), cid("b")];
        let indicators = vec![
            Indicator::before(cid("a"), None, 0.0),
            Indicator::before(cid("b"), None, 100.0),
            Indicator::sentinel(None, 200.0),
        ];
        let mut session = ColumnDrag::start(cid("a"), DISTANCE_OFFSET);
        session.drag_over(None, &indicators, 500.0);
        assert_eq!(
            session.drop(&columns),
            DropOutcome::Reorder(ReorderPlan::Columns {
                order: vec![cid("b"), cid("a")]
            })
        );
    }
}
