//! Persistence boundary
//!
//! The engine talks to storage through [`Store`]: point reads, per-kind scans,
//! and an atomic multi-record [`Store::commit`]. Everything else (read-your-own
//! writes, typed access) lives in [`Transaction`], so a backend only has to
//! get atomic commit right.

mod file;
mod memory;
mod transaction;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use transaction::Transaction;

use crate::error::Result;
use crate::types::{
    Board, BoardId, Column, ColumnId, Comment, CommentId, LinkEdge, Task, TaskId, Team, TeamId,
    User, UserId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of persisted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Team,
    Board,
    Column,
    Task,
    Comment,
    User,
    Link,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Team,
        EntityKind::Board,
        EntityKind::Column,
        EntityKind::Task,
        EntityKind::Comment,
        EntityKind::User,
        EntityKind::Link,
    ];

    /// Resource name used in errors and events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Board => "board",
            Self::Column => "column",
            Self::Task => "task",
            Self::Comment => "comment",
            Self::User => "user",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary key of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityKey {
    Team(TeamId),
    Board(BoardId),
    Column(ColumnId),
    Task(TaskId),
    Comment(CommentId),
    User(UserId),
    Link(LinkEdge),
}

impl EntityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Team(_) => EntityKind::Team,
            Self::Board(_) => EntityKind::Board,
            Self::Column(_) => EntityKind::Column,
            Self::Task(_) => EntityKind::Task,
            Self::Comment(_) => EntityKind::Comment,
            Self::User(_) => EntityKind::User,
            Self::Link(_) => EntityKind::Link,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(id) => write!(f, "team:{id}"),
            Self::Board(id) => write!(f, "board:{id}"),
            Self::Column(id) => write!(f, "column:{id}"),
            Self::Task(id) => write!(f, "task:{id}"),
            Self::Comment(id) => write!(f, "comment:{id}"),
            Self::User(id) => write!(f, "user:{id}"),
            Self::Link(edge) => write!(f, "link:{edge}"),
        }
    }
}

/// A persisted record of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Record {
    Team(Team),
    Board(Board),
    Column(Column),
    Task(Task),
    Comment(Comment),
    User(User),
    Link(LinkEdge),
}

impl Record {
    pub fn key(&self) -> EntityKey {
        match self {
            Self::Team(e) => EntityKey::Team(e.id.clone()),
            Self::Board(e) => EntityKey::Board(e.id.clone()),
            Self::Column(e) => EntityKey::Column(e.id.clone()),
            Self::Task(e) => EntityKey::Task(e.id.clone()),
            Self::Comment(e) => EntityKey::Comment(e.id.clone()),
            Self::User(e) => EntityKey::User(e.id.clone()),
            Self::Link(e) => EntityKey::Link(e.clone()),
        }
    }
}

/// One staged change: `record: None` deletes the key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Write {
    pub key: EntityKey,
    pub record: Option<Record>,
}

/// The persistence layer.
///
/// `commit` must apply every write or none of them. Nothing stronger is
/// assumed: there is no isolation between concurrent transactions, and the
/// last commit to touch a key wins.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read one record
    async fn get(&self, key: &EntityKey) -> Result<Option<Record>>;

    /// Read every record of one kind, ordered by key
    async fn scan(&self, kind: EntityKind) -> Result<Vec<Record>>;

    /// Atomically apply a set of writes
    async fn commit(&self, writes: Vec<Write>) -> Result<()>;
}

/// Typed view over [`Record`] used by [`Transaction`]
pub trait Entity: Sized + Clone + Send + Sync {
    type Id: Clone + fmt::Display + Send + Sync;

    const KIND: EntityKind;

    fn key_for(id: &Self::Id) -> EntityKey;

    fn key(&self) -> EntityKey;

    fn from_record(record: Record) -> Option<Self>;

    fn into_record(self) -> Record;
}

macro_rules! impl_entity {
    ($ty:ident, $id:ident, $variant:ident) => {
        impl Entity for $ty {
            type Id = $id;

            const KIND: EntityKind = EntityKind::$variant;

            fn key_for(id: &$id) -> EntityKey {
                EntityKey::$variant(id.clone())
            }

            fn key(&self) -> EntityKey {
                EntityKey::$variant(self.id.clone())
            }

            fn from_record(record: Record) -> Option<Self> {
                match record {
                    Record::$variant(entity) => Some(entity),
                    _ => None,
                }
            }

            fn into_record(self) -> Record {
                Record::$variant(self)
            }
        }
    };
}

impl_entity!(Team, TeamId, Team);
impl_entity!(Board, BoardId, Board);
impl_entity!(Column, ColumnId, Column);
impl_entity!(Task, TaskId, Task);
impl_entity!(Comment, CommentId, Comment);
impl_entity!(User, UserId, User);

impl Entity for LinkEdge {
    type Id = LinkEdge;

    const KIND: EntityKind = EntityKind::Link;

    fn key_for(id: &LinkEdge) -> EntityKey {
        EntityKey::Link(id.clone())
    }

    fn key(&self) -> EntityKey {
        EntityKey::Link(self.clone())
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Link(edge) => Some(edge),
            _ => None,
        }
    }

    fn into_record(self) -> Record {
        Record::Link(self)
    }
}
