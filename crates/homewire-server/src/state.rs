//! Shared application state.

use std::sync::Arc;

use parking_lot::RwLock;

use homewire_chat::ChatConfig;
use homewire_core::HomewireConfig;
use homewire_crm::{BoldTrailClient, CrmSink};
use homewire_leads::{FallbackLog, LeadPipeline, Notifier, NullNotifier, WebhookNotifier};
use homewire_listings::{ListingSource, ResoClient};

use crate::rates::RateCache;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: HomewireConfig,
    pub listings: Arc<dyn ListingSource>,
    pub pipeline: LeadPipeline,
    pub chat_config: RwLock<ChatConfig>,
    pub rate_cache: RateCache,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build production state from configuration.
    pub fn from_config(config: HomewireConfig) -> Self {
        let listings: Arc<dyn ListingSource> = Arc::new(ResoClient::new(config.idx.clone()));
        let crm: Arc<dyn CrmSink> = Arc::new(BoldTrailClient::new(config.crm.clone()));

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => Arc::new(NullNotifier),
        };

        let fallback = FallbackLog::open(&config.data_paths.lead_fallback_file);
        let pipeline = LeadPipeline::new(crm, fallback, notifier);

        let chat_config = ChatConfig::load(&config.data_paths.llm_config_file);

        Self {
            config,
            listings,
            pipeline,
            chat_config: RwLock::new(chat_config),
            rate_cache: RateCache::default_cache(),
            http: reqwest::Client::new(),
        }
    }
}
