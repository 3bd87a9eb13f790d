//! Progress aggregation: idempotent completion marking, derived percentage
//! and the progress events it emits.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use cradle::{
    Analytics, Article, ArticleMetadata, EventKind, EventSink, KnowledgeBase, ProgressTracker,
    Section, Store, TrackerConfig, TrackingEvent, TrackingQueue,
};

struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn deliver(&self, _events: &[TrackingEvent]) -> Result<()> {
        Ok(())
    }
}

fn section(id: &str) -> Section {
    Section {
        id: id.to_string(),
        title: format!("section {id}"),
        content: String::new(),
        subsections: Vec::new(),
        suggested_questions: Vec::new(),
    }
}

/// A catalog with exactly `count` sections.
fn catalog(count: usize) -> Arc<KnowledgeBase> {
    let sections = (1..=count).map(|i| section(&format!("s{i}"))).collect();
    Arc::new(KnowledgeBase::from_articles(vec![Article {
        id: "article".to_string(),
        title: "article".to_string(),
        metadata: ArticleMetadata {
            read_time: 5,
            last_updated: "2025-01-01".to_string(),
            source: "test".to_string(),
        },
        sections,
    }]))
}

async fn harness(dir: &TempDir, total_sections: usize) -> (TrackingQueue, ProgressTracker) {
    let store = Store::open(dir.path().join("progress.sqlite3")).unwrap();
    let queue = TrackingQueue::new(
        store.clone(),
        Arc::new(NullSink),
        TrackerConfig {
            max_queue_size: 100,
            sync_interval: Duration::from_secs(3600),
            max_retries: 3,
        },
    )
    .await;
    let analytics = Analytics::new("user-progress".to_string(), Arc::new(queue.clone()));
    let progress = ProgressTracker::new(store, analytics, catalog(total_sections));
    (queue, progress)
}

#[tokio::test]
async fn three_of_twelve_is_twenty_five_percent() {
    let dir = TempDir::new().unwrap();
    let (_queue, progress) = harness(&dir, 12).await;

    for id in ["s1", "s2", "s3"] {
        progress.mark_section_completed(id).await;
    }

    let snapshot = progress.learning_progress().await;
    assert_eq!(snapshot.total_sections, 12);
    assert_eq!(snapshot.completed_sections.len(), 3);
    assert_eq!(snapshot.progress_percentage, 25);
    assert_eq!(snapshot.user_id, "user-progress");
}

#[tokio::test]
async fn percentage_is_floored() {
    let dir = TempDir::new().unwrap();
    let (_queue, progress) = harness(&dir, 12).await;

    progress.mark_section_completed("s1").await;
    // 1/12 = 8.33.. -> 8
    assert_eq!(progress.learning_progress().await.progress_percentage, 8);
}

#[tokio::test]
async fn marking_twice_changes_nothing_and_emits_nothing() {
    let dir = TempDir::new().unwrap();
    let (queue, progress) = harness(&dir, 12).await;

    progress.mark_section_completed("s1").await;
    assert_eq!(queue.len().await, 1);

    progress.mark_section_completed("s1").await;
    assert_eq!(queue.len().await, 1);
    assert_eq!(progress.learning_progress().await.completed_sections.len(), 1);
}

#[tokio::test]
async fn completion_emits_a_progress_event_with_counts() {
    let dir = TempDir::new().unwrap();
    let (queue, progress) = harness(&dir, 12).await;

    progress.mark_section_completed("s1").await;

    let events = queue.buffered().await;
    assert_eq!(events.len(), 1);
    match &events[0].kind {
        EventKind::Progress {
            progress_percentage,
            metadata,
        } => {
            assert_eq!(*progress_percentage, 8);
            let metadata: serde_json::Value =
                serde_json::from_str(metadata.as_deref().unwrap()).unwrap();
            assert_eq!(metadata["completedCount"], 1);
            assert_eq!(metadata["totalCount"], 12);
        }
        other => panic!("expected progress event, got {other:?}"),
    }
}

#[tokio::test]
async fn membership_and_reset() {
    let dir = TempDir::new().unwrap();
    let (_queue, progress) = harness(&dir, 12).await;

    assert!(!progress.is_section_completed("s1").await);
    progress.mark_section_completed("s1").await;
    assert!(progress.is_section_completed("s1").await);

    progress.reset().await;
    assert!(!progress.is_section_completed("s1").await);
    assert_eq!(progress.learning_progress().await.progress_percentage, 0);
}

#[tokio::test]
async fn completions_survive_tracker_reconstruction() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("progress.sqlite3")).unwrap();

    {
        let progress = ProgressTracker::new(store.clone(), Analytics::disabled(), catalog(12));
        progress.mark_section_completed("s7").await;
    }

    let progress = ProgressTracker::new(store, Analytics::disabled(), catalog(12));
    assert!(progress.is_section_completed("s7").await);
}
