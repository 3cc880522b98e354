//! Integration tests for mutation events

use kolos_engine::{
    notify::{ActivityLog, BroadcastSink},
    task::{AddTask, GetTask, MoveTask},
    team::CreateTeam,
    user::AddUser,
    KolosContext, KolosOperationProcessor,
};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_activity_log_end_to_end() {
    let temp = TempDir::new().unwrap();
    let log = Arc::new(ActivityLog::new(temp.path().join("activity.jsonl")));
    let ctx = KolosContext::in_memory().with_events(log.clone());
    let processor = KolosOperationProcessor::new().with_actor("ada");

    processor
        .process(&AddUser::new("Ada").with_id("ada"), &ctx)
        .await
        .unwrap();
    let team = processor
        .process(&CreateTeam::new("Core", "ada"), &ctx)
        .await
        .unwrap();
    let board = team["board"]["id"].as_str().unwrap();
    let todo = team["columns"][1]["id"].as_str().unwrap();
    let done = team["columns"][3]["id"].as_str().unwrap();

    let task = processor
        .process(&AddTask::new(board, todo, "ada", "Write docs"), &ctx)
        .await
        .unwrap();
    let task_id = task["id"].as_str().unwrap();
    processor
        .process(&MoveTask::new(task_id, done), &ctx)
        .await
        .unwrap();

    // Reads are not logged
    processor
        .process(&GetTask::new(task_id), &ctx)
        .await
        .unwrap();

    // Failures are not logged either
    assert!(processor
        .process(&MoveTask::new(task_id, "no-such-column"), &ctx)
        .await
        .is_err());

    let entries = log.read(None).await.unwrap();
    let ops: Vec<String> = entries.iter().map(|e| e.op()).collect();
    assert_eq!(ops, ["move task", "add task", "create team", "add user"]);
    assert!(entries.iter().all(|e| e.actor.as_deref() == Some("ada")));
    assert!(entries[0].affected_ids.contains(&task_id.to_string()));
    assert!(entries[1].affected_ids.contains(&board.to_string()));

    let latest = log.read(Some(1)).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].op(), "move task");
}

#[tokio::test]
async fn test_broadcast_sink_delivers_events() {
    let sink = Arc::new(BroadcastSink::new(16));
    let mut events = sink.subscribe();
    let ctx = KolosContext::in_memory().with_events(sink.clone());
    let processor = KolosOperationProcessor::new();

    processor
        .process(&AddUser::new("Ada").with_id("ada"), &ctx)
        .await
        .unwrap();
    processor
        .process(&CreateTeam::new("Core", "ada"), &ctx)
        .await
        .unwrap();

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    assert_eq!(first.op(), "add user");
    assert_eq!(second.op(), "create team");
    assert_eq!(second.entity, "team");
    assert!(second.actor.is_none());
    assert_eq!(second.affected_ids.len(), 3);
}
