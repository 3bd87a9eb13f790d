pub mod analytics;
pub mod event;
pub mod progress;
pub mod queue;
pub mod reading;
pub mod sink;

pub use analytics::{anonymous_user_id, Analytics};
pub use event::{EventKind, TrackingEvent};
pub use progress::{reading_completed, LearningProgress, ProgressTracker};
pub use queue::{NoopTracker, Tracker, TrackingQueue};
pub use reading::{scroll_depth, PageVisit, ReadingSession, DEFAULT_READ_TIME_MINS};
pub use sink::{EventSink, SheetsSink};
