use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::Config;
use crate::engine::gate::AssignmentGate;
use crate::engine::pool::{PoolRunner, WorkerPool};
use crate::geo::GeoIndex;
use crate::models::assignment::DispatchEvent;
use crate::models::order::OrderRecord;
use crate::notify::Notifier;
use crate::notify::push::PushGateway;
use crate::notify::tokens::TokenStore;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub config: Config,
    pub geo: GeoIndex,
    pub gate: AssignmentGate,
    pub orders: DashMap<Uuid, OrderRecord>,
    pub tokens: TokenStore,
    pub notifier: Notifier,
    pub pool: WorkerPool,
    pub events_tx: broadcast::Sender<DispatchEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn PushGateway>) -> (Self, PoolRunner) {
        let metrics = Metrics::new();
        let tokens = TokenStore::new(config.token_ttl_secs);
        let (pool, runner) = WorkerPool::new(
            config.worker_count,
            config.task_queue_size,
            metrics.tasks_in_queue.clone(),
        );
        let (events_tx, _unused_rx) = broadcast::channel(config.event_buffer_size);
        let notifier = Notifier::new(tokens.clone(), gateway, metrics.clone());

        (
            Self {
                config,
                geo: GeoIndex::new(),
                gate: AssignmentGate::new(),
                orders: DashMap::new(),
                tokens,
                notifier,
                pool,
                events_tx,
                metrics,
            },
            runner,
        )
    }
}
