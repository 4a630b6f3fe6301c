use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use prometheus::IntGauge;
use tokio::sync::{Semaphore, mpsc};
use tracing::{info, warn};

pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Bounded task queue with fixed worker concurrency. Submission is
/// non-blocking; on a full queue the task is handed back so the caller can
/// run it inline (guaranteed-execution fallback).
#[derive(Clone)]
pub struct WorkerPool {
    tx: mpsc::Sender<Task>,
    depth: IntGauge,
}

impl WorkerPool {
    pub fn new(worker_count: usize, queue_size: usize, depth: IntGauge) -> (Self, PoolRunner) {
        let (tx, rx) = mpsc::channel(queue_size);
        let runner = PoolRunner {
            rx,
            permits: Arc::new(Semaphore::new(worker_count.max(1))),
            depth: depth.clone(),
        };

        (Self { tx, depth }, runner)
    }

    pub fn try_submit(&self, task: Task) -> Result<(), Task> {
        match self.tx.try_send(task) {
            Ok(()) => {
                self.depth.inc();
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(task))
            | Err(mpsc::error::TrySendError::Closed(task)) => Err(task),
        }
    }

    /// Submits the task, or runs it on the calling task when the queue is
    /// saturated so the work is never dropped outright.
    pub async fn submit_or_run(&self, task: Task) {
        if let Err(task) = self.try_submit(task) {
            warn!("worker pool saturated; running task inline");
            task.await;
        }
    }
}

pub struct PoolRunner {
    rx: mpsc::Receiver<Task>,
    permits: Arc<Semaphore>,
    depth: IntGauge,
}

impl PoolRunner {
    pub async fn run(mut self) {
        info!("worker pool started");

        while let Some(task) = self.rx.recv().await {
            self.depth.dec();

            let Ok(permit) = self.permits.clone().acquire_owned().await else {
                break;
            };
            tokio::spawn(async move {
                task.await;
                drop(permit);
            });
        }

        warn!("worker pool stopped: task channel closed");
    }
}
