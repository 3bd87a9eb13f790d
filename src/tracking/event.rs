use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed user-interaction fact. Immutable once created; owned by the
/// queue until a flush confirms delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
    /// Seconds spent, for events with a meaningful span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// The closed set of event types. Each variant carries only its own fields;
/// on the wire they flatten into one row next to the `eventType` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "snake_case")]
pub enum EventKind {
    PageView {
        page: String,
    },
    #[serde(rename_all = "camelCase")]
    Reading {
        section_id: String,
        section_title: String,
        scroll_depth: u8,
    },
    Question {
        question: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Progress {
        progress_percentage: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<String>,
    },
}

impl TrackingEvent {
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            EventKind::PageView { .. } => "page_view",
            EventKind::Reading { .. } => "reading",
            EventKind::Question { .. } => "question",
            EventKind::Progress { .. } => "progress",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, duration: Option<u64>) -> TrackingEvent {
        TrackingEvent {
            user_id: "user_1700000000000_abc123def".to_string(),
            timestamp: Utc::now(),
            kind,
            duration,
        }
    }

    #[test]
    fn page_view_row_shape() {
        let event = event(
            EventKind::PageView {
                page: "home".to_string(),
            },
            None,
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventType"], "page_view");
        assert_eq!(value["page"], "home");
        assert_eq!(value["userId"], "user_1700000000000_abc123def");
        assert!(value.get("duration").is_none());
        assert!(value.get("sectionId").is_none());
    }

    #[test]
    fn reading_row_uses_camel_case_fields() {
        let event = event(
            EventKind::Reading {
                section_id: "labor-signs".to_string(),
                section_title: "產兆辨識".to_string(),
                scroll_depth: 85,
            },
            Some(181),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["eventType"], "reading");
        assert_eq!(value["sectionId"], "labor-signs");
        assert_eq!(value["sectionTitle"], "產兆辨識");
        assert_eq!(value["scrollDepth"], 85);
        assert_eq!(value["duration"], 181);
    }

    #[test]
    fn events_round_trip() {
        let original = event(
            EventKind::Progress {
                progress_percentage: 25,
                metadata: Some("{\"completedCount\":3,\"totalCount\":12}".to_string()),
            },
            None,
        );

        let json = serde_json::to_string(&original).unwrap();
        let decoded: TrackingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.event_type(), "progress");
    }
}
