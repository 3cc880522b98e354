//! Optimistic board state for drag-and-drop

use super::drag::{CardDrag, ColumnDrag, ReorderPlan};
use crate::assembly::{BoardAssembler, BoardSnapshot};
use crate::board::{ReorderBoardTasks, ReorderColumns};
use crate::context::KolosContext;
use crate::error::Result;
use crate::processor::KolosOperationProcessor;
use crate::task::MoveTask;
use crate::types::{BoardId, ColumnId, TaskId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Client-side cache of assembled boards.
///
/// A drop is applied to the cached snapshot first, then persisted. When
/// persisting fails the cached snapshot is discarded rather than rolled back;
/// the next [`board`](BoardCache::board) call reassembles it from the store.
/// The snapshot as of the last successful fetch or persist stays available
/// through [`last_known_good`](BoardCache::last_known_good).
pub struct BoardCache {
    ctx: KolosContext,
    processor: KolosOperationProcessor,
    current: HashMap<BoardId, BoardSnapshot>,
    last_known_good: HashMap<BoardId, BoardSnapshot>,
}

impl BoardCache {
    pub fn new(ctx: KolosContext) -> Self {
        Self {
            ctx,
            processor: KolosOperationProcessor::new(),
            current: HashMap::new(),
            last_known_good: HashMap::new(),
        }
    }

    /// Persist drops through `processor` (to attribute their events)
    pub fn with_processor(mut self, processor: KolosOperationProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// The cached board, assembling it on a miss
    pub async fn board(&mut self, id: &BoardId) -> Result<&BoardSnapshot> {
        match self.current.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let tx = self.ctx.begin();
                let snapshot = BoardAssembler::new(&tx).await?.assemble(id).await?;
                debug!(board = %id, tasks = snapshot.tasks.len(), "board assembled");
                self.last_known_good.insert(id.clone(), snapshot.clone());
                Ok(&*entry.insert(snapshot))
            }
        }
    }

    /// The cached board without fetching
    pub fn cached(&self, id: &BoardId) -> Option<&BoardSnapshot> {
        self.current.get(id)
    }

    pub fn last_known_good(&self, id: &BoardId) -> Option<&BoardSnapshot> {
        self.last_known_good.get(id)
    }

    /// Forget the cached board; returns whether one was cached
    pub fn invalidate(&mut self, id: &BoardId) -> bool {
        self.current.remove(id).is_some()
    }

    /// Start dragging a card with the configured distance offset
    pub fn card_drag(&self, task: impl Into<TaskId>) -> CardDrag {
        CardDrag::start(task.into(), self.ctx.config().reorder.distance_offset)
    }

    /// Start dragging a column with the configured distance offset
    pub fn column_drag(&self, column: impl Into<ColumnId>) -> ColumnDrag {
        ColumnDrag::start(column.into(), self.ctx.config().reorder.distance_offset)
    }

    /// Apply a drop to the cached board, then persist it.
    ///
    /// The cache reflects the drop before the first write is issued. A card
    /// that crossed columns is moved before the board's order is rewritten.
    pub async fn apply_drop(&mut self, board: &BoardId, plan: &ReorderPlan) -> Result<()> {
        let snapshot = self.board(board).await?;
        let mut updated = snapshot.clone();
        match plan {
            ReorderPlan::Cards {
                task,
                column,
                order,
            } => updated.apply_card_order(task, column.as_ref(), order),
            ReorderPlan::Columns { order } => updated.apply_column_order(order),
        }
        self.current.insert(board.clone(), updated.clone());

        match self.persist(board, plan).await {
            Ok(()) => {
                self.last_known_good.insert(board.clone(), updated);
                Ok(())
            }
            Err(error) => {
                warn!(board = %board, %error, "drop not persisted; discarding cached board");
                self.invalidate(board);
                Err(error)
            }
        }
    }

    async fn persist(&self, board: &BoardId, plan: &ReorderPlan) -> Result<()> {
        match plan {
            ReorderPlan::Cards {
                task,
                column,
                order,
            } => {
                if let Some(column) = column {
                    self.processor
                        .process(&MoveTask::new(task, column), &self.ctx)
                        .await?;
                }
                self.processor
                    .process(&ReorderBoardTasks::new(board, order.clone()), &self.ctx)
                    .await?;
            }
            ReorderPlan::Columns { order } => {
                self.processor
                    .process(&ReorderColumns::new(board, order.clone()), &self.ctx)
                    .await?;
            }
        }
        Ok(())
    }
}
