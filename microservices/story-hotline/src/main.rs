//! Story Hotline Microservice
//!
//! Webhook application for a telephony provider:
//! - Greets callers and offers a one-digit menu
//! - Records a spoken story and texts the caller a confirmation
//! - Collects a photo by text message
//! - Keeps every recording and image URL per caller in a key-value store

mod call_flow;
mod config;
mod error;
mod handlers;
mod media;
mod messaging;
mod params;
mod routes;
mod twiml;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use storyline_core::{
    DependencyStatus, HealthStatus, MicroserviceRuntime, ReadinessStatus, StorylineError,
    StorylineService,
};
use storyline_kv::{KvPool, KvStore, LumaKvStore, MemoryKvStore};

pub use config::{HotlineConfig, StoreBackend};
pub use error::{Error, Result};

use media::MediaAccumulator;
use messaging::TwilioMessenger;

const SERVICE_ID: &str = "story-hotline";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accumulator: Arc<MediaAccumulator>,
    pub store: Arc<dyn KvStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: SERVICE_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }

    pub async fn readiness_status(&self) -> ReadinessStatus {
        let started = Instant::now();
        let available = self.store.is_healthy().await;
        let latency_ms = started.elapsed().as_millis() as u64;

        ReadinessStatus {
            ready: available,
            dependencies: vec![DependencyStatus {
                name: format!("kv-store ({})", self.store.backend()),
                available,
                latency_ms: available.then_some(latency_ms),
            }],
        }
    }
}

#[tokio::main]
async fn main() -> storyline_core::Result<()> {
    storyline_telemetry::init(SERVICE_ID)
        .map_err(|e| StorylineError::Internal(e.to_string()))?;

    info!("Starting Story Hotline microservice");

    let config = HotlineConfig::from_env()?;
    let service = Arc::new(HotlineService::new(config).await?);
    MicroserviceRuntime::run(service).await
}

pub struct HotlineService {
    config: HotlineConfig,
    state: AppState,
}

impl HotlineService {
    pub async fn new(config: HotlineConfig) -> storyline_core::Result<Self> {
        let store = build_store(&config).await?;

        if !config.messaging.has_credentials() {
            warn!("ACCOUNT_SID/AUTH_TOKEN not set; confirmation texts will not be sent");
        }
        let messenger = TwilioMessenger::new(&config.messaging)
            .map_err(|e| StorylineError::Config(e.to_string()))?;

        let accumulator = MediaAccumulator::new(
            store.clone(),
            Arc::new(messenger),
            config.messaging.from_number.clone(),
        );

        Ok(Self {
            state: AppState {
                accumulator: Arc::new(accumulator),
                store,
                started_at: Instant::now(),
            },
            config,
        })
    }
}

async fn build_store(config: &HotlineConfig) -> storyline_core::Result<Arc<dyn KvStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; caller media is lost on restart");
            Ok(Arc::new(MemoryKvStore::new()))
        }
        StoreBackend::LumaDb => {
            let pool = KvPool::new(&config.store)
                .map_err(|e| StorylineError::Storage(e.to_string()))?;
            let store = LumaKvStore::new(pool.clone());

            // Retried by the first store operation if the store is not up yet
            if let Err(e) = store.ensure_schema().await {
                warn!(error = %e, "Key-value table not created at startup");
            }
            debug!(stats = ?pool.stats(), "Key-value store pool ready");

            Ok(Arc::new(store))
        }
    }
}

#[async_trait::async_trait]
impl StorylineService for HotlineService {
    fn service_id(&self) -> &'static str {
        SERVICE_ID
    }

    async fn health(&self) -> HealthStatus {
        self.state.health_status()
    }

    async fn ready(&self) -> ReadinessStatus {
        self.state.readiness_status().await
    }

    async fn shutdown(&self) -> storyline_core::Result<()> {
        info!("Shutting down Story Hotline");
        Ok(())
    }

    async fn start(&self) -> storyline_core::Result<()> {
        let bind_addr = self.config.service.http_bind();
        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            bind = %bind_addr,
            store = self.state.store.backend(),
            "Story Hotline listening"
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}
