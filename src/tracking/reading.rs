use std::time::Instant;

use super::analytics::Analytics;
use super::progress::{reading_completed, ProgressTracker};

/// Assumed when the content metadata carries no estimate.
pub const DEFAULT_READ_TIME_MINS: u32 = 5;

/// Percentage of vertical scroll progress: 0 at the top, 100 once the
/// viewport bottom reaches the document end. A document that fits the
/// viewport counts as fully scrolled.
pub fn scroll_depth(scroll_top: f64, document_height: f64, viewport_height: f64) -> u8 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 100;
    }

    let depth = (scroll_top / scrollable * 100.0).floor();
    depth.clamp(0.0, 100.0) as u8
}

/// One visit to a knowledge section: dwell time from construction to
/// [`ReadingSession::finish`], plus the furthest scroll position reported
/// while mounted. What matters for completion is the maximum depth reached,
/// not where the reader happens to be at teardown.
pub struct ReadingSession {
    analytics: Analytics,
    progress: ProgressTracker,
    section_id: String,
    section_title: String,
    estimated_read_time_mins: u32,
    started: Instant,
    max_scroll_depth: u8,
}

impl ReadingSession {
    pub fn begin(
        analytics: Analytics,
        progress: ProgressTracker,
        section_id: impl Into<String>,
        section_title: impl Into<String>,
        estimated_read_time_mins: Option<u32>,
    ) -> Self {
        Self {
            analytics,
            progress,
            section_id: section_id.into(),
            section_title: section_title.into(),
            estimated_read_time_mins: estimated_read_time_mins.unwrap_or(DEFAULT_READ_TIME_MINS),
            started: Instant::now(),
            max_scroll_depth: 0,
        }
    }

    /// Report a scroll position. Returns the depth at this position; the
    /// session keeps the running maximum. Call once right after mounting so
    /// a short visit still has a defined depth.
    pub fn observe_scroll(
        &mut self,
        scroll_top: f64,
        document_height: f64,
        viewport_height: f64,
    ) -> u8 {
        let depth = scroll_depth(scroll_top, document_height, viewport_height);
        self.max_scroll_depth = self.max_scroll_depth.max(depth);
        depth
    }

    pub fn max_scroll_depth(&self) -> u8 {
        self.max_scroll_depth
    }

    /// End the visit: emit the reading event and, when the completion rule
    /// holds, mark the section completed. Marking is idempotent, so revisits
    /// of a finished section are harmless.
    pub async fn finish(self) {
        let duration_secs = self.started.elapsed().as_secs();
        self.finish_with_duration(duration_secs).await;
    }

    async fn finish_with_duration(self, duration_secs: u64) {
        self.analytics
            .reading(
                &self.section_id,
                &self.section_title,
                duration_secs,
                self.max_scroll_depth,
            )
            .await;

        if reading_completed(
            duration_secs,
            self.max_scroll_depth,
            self.estimated_read_time_mins,
        ) {
            self.progress.mark_section_completed(&self.section_id).await;
        }
    }
}

/// Generic page instrumentation: a page_view on mount and a second one
/// carrying the dwell time on unmount. Never touches reading progress.
pub struct PageVisit {
    analytics: Analytics,
    page: String,
    started: Instant,
}

impl PageVisit {
    pub async fn begin(analytics: Analytics, page: impl Into<String>) -> Self {
        let page = page.into();
        analytics.page_view(&page, None).await;
        Self {
            analytics,
            page,
            started: Instant::now(),
        }
    }

    pub async fn finish(self) {
        let duration_secs = self.started.elapsed().as_secs();
        self.analytics
            .page_view(&self.page, Some(duration_secs))
            .await;
    }
}
