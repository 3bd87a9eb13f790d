use anyhow::Result;

use crate::models::AiConfig;
use crate::store::{keys, Store};

pub const DEFAULT_LOCALE: &str = "zh-TW";

/// User-facing configuration that lives in the store next to the app data:
/// locale, the one-time dialog flags and the AI credentials.
#[derive(Clone)]
pub struct Settings {
    store: Store,
}

impl Settings {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn locale(&self) -> String {
        self.store
            .read_or_default::<Option<String>>(keys::LOCALE)
            .await
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    pub async fn set_locale(&self, locale: &str) -> Result<()> {
        self.store.put(keys::LOCALE, locale).await
    }

    pub async fn welcome_seen(&self) -> bool {
        self.store.read_or_default(keys::WELCOME_SEEN).await
    }

    pub async fn mark_welcome_seen(&self) -> Result<()> {
        self.store.put(keys::WELCOME_SEEN, &true).await
    }

    pub async fn tracking_notice_seen(&self) -> bool {
        self.store.read_or_default(keys::TRACKING_NOTICE_SEEN).await
    }

    pub async fn mark_tracking_notice_seen(&self) -> Result<()> {
        self.store.put(keys::TRACKING_NOTICE_SEEN, &true).await
    }

    pub async fn ai_config(&self) -> Option<AiConfig> {
        self.store
            .read_or_default::<Option<AiConfig>>(keys::AI_CONFIG)
            .await
    }

    pub async fn set_ai_config(&self, config: &AiConfig) -> Result<()> {
        self.store.put(keys::AI_CONFIG, config).await
    }

    pub async fn clear_ai_config(&self) -> Result<()> {
        self.store.remove(keys::AI_CONFIG).await
    }
}
