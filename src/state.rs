//! Application state management

use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::Config;
use crate::ingest::IngestionPipeline;
use crate::ocr::OcrService;
use crate::raster::MupdfRasterizer;
use crate::session::{SessionResolver, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: IngestionPipeline,
    resolver: SessionResolver,
    chat: ChatService,
}

impl AppState {
    /// Wire the production components from configuration
    pub fn new(config: Config) -> Self {
        let store = SessionStore::new(config.storage.session_store_path.clone());

        let pipeline = IngestionPipeline::new(
            Arc::new(MupdfRasterizer::new(config.raster.scale)),
            Arc::new(OcrService::new(&config.ocr)),
            store.clone(),
            config.storage.work_dir.clone(),
        );

        let resolver = SessionResolver::new(store);
        let chat = ChatService::new(&config.chat, Arc::new(resolver.clone()));

        Self::from_parts(config, pipeline, resolver, chat)
    }

    /// Assemble state from already built components
    pub fn from_parts(
        config: Config,
        pipeline: IngestionPipeline,
        resolver: SessionResolver,
        chat: ChatService,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                resolver,
                chat,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestionPipeline {
        &self.inner.pipeline
    }

    /// Get the read-only session resolver
    pub fn resolver(&self) -> &SessionResolver {
        &self.inner.resolver
    }

    /// Get the chat service
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }
}
