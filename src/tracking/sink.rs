use anyhow::{Context, Result};
use async_trait::async_trait;
use log::warn;
use reqwest::header::CONTENT_TYPE;

use super::event::TrackingEvent;

/// Delivery target for batched tracking events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one ordered batch. `Ok` means the transport call completed;
    /// the relay's HTTP status is not part of the contract.
    async fn deliver(&self, events: &[TrackingEvent]) -> Result<()>;
}

/// Posts batches to the spreadsheet relay (a Google Apps Script web app).
pub struct SheetsSink {
    endpoint: String,
    client: reqwest::Client,
}

impl SheetsSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EventSink for SheetsSink {
    async fn deliver(&self, events: &[TrackingEvent]) -> Result<()> {
        if self.endpoint.is_empty() {
            warn!(
                "sheets relay URL not configured; dropping {} tracking event(s)",
                events.len()
            );
            return Ok(());
        }

        if events.is_empty() {
            return Ok(());
        }

        let body =
            serde_json::to_string(events).context("failed to serialize tracking batch")?;

        // The relay wants text/plain and returns nothing readable; a
        // completed transport call is the only delivery signal we get.
        self.client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .context("failed to post tracking batch to sheets relay")?;

        Ok(())
    }
}
