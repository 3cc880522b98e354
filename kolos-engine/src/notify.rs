//! Hand-off of mutation events to the notification layer
//!
//! Delivery, fan-out and read tracking belong to whoever subscribes. The
//! engine only publishes after a mutation has committed.

use crate::error::Result;
use async_trait::async_trait;
use kolos_operations::MutationEvent;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

/// Receives events for committed mutations
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: &MutationEvent) -> Result<()>;
}

/// Drops every event
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn publish(&self, _event: &MutationEvent) -> Result<()> {
        Ok(())
    }
}

/// Forwards events to a tokio broadcast channel for a real-time layer
pub struct BroadcastSink {
    sender: broadcast::Sender<MutationEvent>,
}

impl BroadcastSink {
    /// Create a channel buffering up to `capacity` events per slow subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<MutationEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventSink for BroadcastSink {
    async fn publish(&self, event: &MutationEvent) -> Result<()> {
        // No subscribers is not an error
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

/// Append-only JSONL activity log
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read entries, newest first
    pub async fn read(&self, limit: Option<usize>) -> Result<Vec<MutationEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let mut entries: Vec<MutationEvent> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }
}

#[async_trait]
impl EventSink for ActivityLog {
    async fn publish(&self, event: &MutationEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
