use std::sync::Arc;

use chrono::Utc;
use log::warn;
use rand::Rng;
use serde_json::json;

use crate::store::{keys, Store};

use super::event::{EventKind, TrackingEvent};
use super::queue::{NoopTracker, Tracker};

const USER_ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Load the per-profile anonymous identifier, creating and persisting it on
/// first use. The identifier never changes while the store survives.
pub async fn anonymous_user_id(store: &Store) -> String {
    if let Some(existing) = store.read_or_default::<Option<String>>(keys::USER_ID).await {
        return existing;
    }

    let user_id = generate_user_id();
    if let Err(err) = store.put(keys::USER_ID, &user_id).await {
        warn!("failed to persist anonymous user id: {err:#}");
    }
    user_id
}

fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..USER_ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("user_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Stamps identity and creation time onto raw observations and hands them to
/// the tracker. Clones share the same underlying queue.
#[derive(Clone)]
pub struct Analytics {
    user_id: String,
    tracker: Arc<dyn Tracker>,
}

impl Analytics {
    pub fn new(user_id: String, tracker: Arc<dyn Tracker>) -> Self {
        Self { user_id, tracker }
    }

    /// An instance that records nothing, for contexts without a store.
    pub fn disabled() -> Self {
        Self::new(String::new(), Arc::new(NoopTracker))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// A page was shown (`duration: None`) or left (`duration: Some`).
    pub async fn page_view(&self, page: &str, duration: Option<u64>) {
        self.add(
            EventKind::PageView {
                page: page.to_string(),
            },
            duration,
        )
        .await;
    }

    pub async fn reading(
        &self,
        section_id: &str,
        section_title: &str,
        duration_secs: u64,
        scroll_depth: u8,
    ) {
        self.add(
            EventKind::Reading {
                section_id: section_id.to_string(),
                section_title: section_title.to_string(),
                scroll_depth,
            },
            Some(duration_secs),
        )
        .await;
    }

    pub async fn question(&self, question: &str, context: Option<&str>) {
        let metadata = context.map(|ctx| json!({ "context": ctx }).to_string());
        self.add(
            EventKind::Question {
                question: question.to_string(),
                metadata,
            },
            None,
        )
        .await;
    }

    pub async fn progress(&self, percentage: u8, metadata: Option<serde_json::Value>) {
        self.add(
            EventKind::Progress {
                progress_percentage: percentage,
                metadata: metadata.map(|value| value.to_string()),
            },
            None,
        )
        .await;
    }

    pub async fn sync_now(&self) {
        self.tracker.sync_now().await;
    }

    async fn add(&self, kind: EventKind, duration: Option<u64>) {
        self.tracker
            .add(TrackingEvent {
                user_id: self.user_id.clone(),
                timestamp: Utc::now(),
                kind,
                duration,
            })
            .await;
    }
}
