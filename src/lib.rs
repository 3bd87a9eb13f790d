mod ai;
mod chat;
mod config;
mod knowledge;
mod models;
mod pregnancy;
mod records;
mod settings;
mod store;
mod tracking;
mod utils;

pub use ai::{
    default_model, AiClient, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL, SYMPTOM_CHECK_PROMPT,
    SYSTEM_PROMPT,
};
pub use chat::{append_message, new_message, new_session, session_title, ChatStore};
pub use config::{AppConfig, TrackerConfig, SHEETS_URL_ENV};
pub use knowledge::{Article, ArticleMetadata, KnowledgeBase, Section, Subsection};
pub use models::*;
pub use pregnancy::{
    days_until_due, due_date_from_lmp, format_week, lmp_from_due_date, milestone,
    prenatal_checkups, trimester, weeks_from_due_date, weeks_from_lmp, CheckupSchedule,
    GestationalAge, Milestone, PregnancyStatus, PregnancyTracker, TERM_DAYS,
};
pub use records::RecordStore;
pub use settings::{Settings, DEFAULT_LOCALE};
pub use store::{keys, Store};
pub use tracking::{
    anonymous_user_id, reading_completed, scroll_depth, Analytics, EventKind, EventSink,
    LearningProgress, NoopTracker, PageVisit, ProgressTracker, ReadingSession, SheetsSink,
    Tracker, TrackingEvent, TrackingQueue, DEFAULT_READ_TIME_MINS,
};
pub use utils::logging::init_logging;

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use log::info;

const DB_FILE: &str = "cradle.sqlite3";

/// Composition root: owns the profile store and every service built on it.
/// All tracking call sites go through [`Analytics`], which wraps the shared
/// queue; peripheral services talk to the store directly.
pub struct App {
    store: Store,
    queue: Arc<TrackingQueue>,
    analytics: Analytics,
    progress: ProgressTracker,
    knowledge: Arc<KnowledgeBase>,
    records: RecordStore,
    chat: ChatStore,
    ai: AiClient,
    pregnancy: PregnancyTracker,
    settings: Settings,
}

impl App {
    /// Open the profile store, wire every service and start the periodic
    /// tracking flush.
    pub async fn init(config: AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "failed to create data directory {}",
                config.data_dir.display()
            )
        })?;

        let store = Store::open(config.data_dir.join(DB_FILE))?;

        let user_id = anonymous_user_id(&store).await;
        let sink = Arc::new(SheetsSink::new(config.sheets_url.clone()));
        let queue = Arc::new(TrackingQueue::new(store.clone(), sink, config.tracker).await);
        queue.start_auto_sync().await;

        let analytics = Analytics::new(user_id, queue.clone());
        let knowledge = Arc::new(KnowledgeBase::builtin()?);
        let progress = ProgressTracker::new(store.clone(), analytics.clone(), knowledge.clone());

        info!("cradle core initialized for {}", analytics.user_id());

        Ok(Self {
            records: RecordStore::new(store.clone()),
            chat: ChatStore::new(store.clone()),
            ai: AiClient::new(),
            pregnancy: PregnancyTracker::new(store.clone()),
            settings: Settings::new(store.clone()),
            store,
            queue,
            analytics,
            progress,
            knowledge,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn chat(&self) -> &ChatStore {
        &self.chat
    }

    pub fn ai(&self) -> &AiClient {
        &self.ai
    }

    pub fn pregnancy(&self) -> &PregnancyTracker {
        &self.pregnancy
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start instrumentation for a generic page.
    pub async fn visit_page(&self, page: &str) -> PageVisit {
        PageVisit::begin(self.analytics.clone(), page).await
    }

    /// Start instrumentation for a knowledge section; title and estimated
    /// read time come from the catalog. `None` for an unknown id.
    pub fn read_section(&self, section_id: &str) -> Option<ReadingSession> {
        let title = self.knowledge.section_title(section_id)?.to_string();
        let read_time = self.knowledge.read_time_for_section(section_id);

        Some(ReadingSession::begin(
            self.analytics.clone(),
            self.progress.clone(),
            section_id,
            title,
            read_time,
        ))
    }

    /// Send one user turn through the configured provider. The user message
    /// is appended first, the question is recorded, and the session is
    /// persisted once the reply arrives.
    pub async fn send_chat_message(
        &self,
        session: &mut ChatSession,
        content: &str,
        symptom_check: bool,
    ) -> Result<String> {
        let config = self
            .settings
            .ai_config()
            .await
            .ok_or_else(|| anyhow!("AI provider is not configured"))?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            bail!("message is empty");
        }

        append_message(session, new_message(ChatRole::User, trimmed));
        self.analytics.question(trimmed, None).await;

        let reply = self.ai.chat(&config, &session.messages, symptom_check).await?;
        append_message(session, new_message(ChatRole::Assistant, reply.clone()));
        self.chat.save_session(session.clone()).await?;

        Ok(reply)
    }

    /// Flush whatever is buffered and stop the periodic task. The
    /// page-unload analog; call before dropping the app.
    pub async fn shutdown(&self) {
        self.queue.shutdown().await;
    }
}
