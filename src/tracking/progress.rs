use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use serde_json::json;

use crate::knowledge::KnowledgeBase;
use crate::store::{keys, Store};

use super::analytics::Analytics;

/// Snapshot derived from the completed-section list. Never persisted, so the
/// percentage cannot drift when the catalog changes between releases.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    pub user_id: String,
    pub total_sections: usize,
    pub completed_sections: Vec<String>,
    pub progress_percentage: u8,
    pub last_updated: DateTime<Utc>,
}

/// Completion rule for one knowledge section: at least half the estimated
/// read time spent AND at least 80% scrolled. Both are required.
pub fn reading_completed(
    duration_secs: u64,
    max_scroll_depth: u8,
    estimated_read_time_mins: u32,
) -> bool {
    duration_secs >= u64::from(estimated_read_time_mins) * 30 && max_scroll_depth >= 80
}

/// Tracks which knowledge sections have been read to completion and derives
/// the overall percentage against the static catalog.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Store,
    analytics: Analytics,
    catalog: Arc<KnowledgeBase>,
}

impl ProgressTracker {
    pub fn new(store: Store, analytics: Analytics, catalog: Arc<KnowledgeBase>) -> Self {
        Self {
            store,
            analytics,
            catalog,
        }
    }

    pub async fn completed_sections(&self) -> Vec<String> {
        self.store.read_or_default(keys::COMPLETED_SECTIONS).await
    }

    pub async fn is_section_completed(&self, section_id: &str) -> bool {
        self.completed_sections()
            .await
            .iter()
            .any(|id| id == section_id)
    }

    /// Record a completion. An already-completed section changes nothing and
    /// emits nothing.
    pub async fn mark_section_completed(&self, section_id: &str) {
        let mut completed = self.completed_sections().await;
        if completed.iter().any(|id| id == section_id) {
            return;
        }

        completed.push(section_id.to_string());
        if let Err(err) = self.store.put(keys::COMPLETED_SECTIONS, &completed).await {
            error!("failed to persist completed sections: {err:#}");
        }

        let progress = self.progress_from(completed);
        info!(
            "section '{}' completed ({}% overall)",
            section_id, progress.progress_percentage
        );

        self.analytics
            .progress(
                progress.progress_percentage,
                Some(json!({
                    "completedCount": progress.completed_sections.len(),
                    "totalCount": progress.total_sections,
                })),
            )
            .await;
    }

    /// Recompute the snapshot from the persisted set.
    pub async fn learning_progress(&self) -> LearningProgress {
        self.progress_from(self.completed_sections().await)
    }

    /// Clear all recorded completions. Debug/test affordance, not part of
    /// the normal flow.
    pub async fn reset(&self) {
        if let Err(err) = self.store.remove(keys::COMPLETED_SECTIONS).await {
            error!("failed to reset progress: {err:#}");
        }
    }

    fn progress_from(&self, completed: Vec<String>) -> LearningProgress {
        let total = self.catalog.total_sections();
        let percentage = if total == 0 {
            0
        } else {
            (completed.len() * 100 / total) as u8
        };

        LearningProgress {
            user_id: self.analytics.user_id().to_string(),
            total_sections: total,
            completed_sections: completed,
            progress_percentage: percentage,
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rule_requires_both_conditions() {
        // 5 estimated minutes -> 150 seconds of dwell required
        assert!(reading_completed(181, 85, 5));
        assert!(reading_completed(150, 80, 5));
        assert!(!reading_completed(100, 90, 5));
        assert!(!reading_completed(300, 79, 5));
        assert!(!reading_completed(149, 100, 5));
    }

    #[test]
    fn completion_rule_uses_supplied_read_time() {
        assert!(reading_completed(60, 80, 2));
        assert!(!reading_completed(59, 80, 2));
    }
}
