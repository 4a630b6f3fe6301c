use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::poll::{PollOutcome, poll_until};
use crate::engine::selector::select_candidates;
use crate::models::assignment::DispatchEvent;
use crate::models::courier::GeoPoint;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub order_id: Uuid,
    pub pickup: GeoPoint,
    pub wave_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Assigned,
    Exhausted,
    NoCandidates,
}

impl DispatchOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchOutcome::Assigned => "assigned",
            DispatchOutcome::Exhausted => "exhausted",
            DispatchOutcome::NoCandidates => "no_candidates",
        }
    }
}

/// Per-order dispatch run: candidate search once, then nearest-first waves
/// of offers, polling the assignment gate between waves until the gate is
/// set or the candidate list runs out.
pub async fn run_dispatch(state: Arc<AppState>, job: DispatchJob) {
    let started = Instant::now();
    let outcome = dispatch_waves(&state, &job).await;
    let elapsed = started.elapsed().as_secs_f64();

    state
        .metrics
        .dispatch_runs_total
        .with_label_values(&[outcome.as_label()])
        .inc();
    state
        .metrics
        .dispatch_run_seconds
        .with_label_values(&[outcome.as_label()])
        .observe(elapsed);

    info!(
        order_id = %job.order_id,
        outcome = outcome.as_label(),
        elapsed_secs = elapsed,
        "dispatch run finished"
    );
}

async fn dispatch_waves(state: &Arc<AppState>, job: &DispatchJob) -> DispatchOutcome {
    let candidates = select_candidates(
        &state.geo,
        &state.tokens,
        &state.gate,
        &job.pickup,
        state.config.search_radius_km,
        state.config.candidate_cap,
    );

    if candidates.is_empty() {
        debug!(order_id = %job.order_id, "no available couriers found");
        return DispatchOutcome::NoCandidates;
    }

    info!(
        order_id = %job.order_id,
        candidates = candidates.len(),
        wave_size = job.wave_size,
        "starting offer waves"
    );

    for wave in candidates.chunks(job.wave_size.max(1)) {
        if state.gate.is_assigned(job.order_id) {
            return DispatchOutcome::Assigned;
        }

        for &courier_id in wave {
            // Re-check before each send to keep wasted offers to a minimum.
            if state.gate.is_assigned(job.order_id) {
                return DispatchOutcome::Assigned;
            }

            state.notifier.offer_order(courier_id, job.order_id).await;
            if state
                .events_tx
                .send(DispatchEvent::OfferSent {
                    order_id: job.order_id,
                    courier_id,
                })
                .is_err()
            {
                debug!(order_id = %job.order_id, "no dispatch event subscribers");
            }
        }

        let waited = poll_until(
            || state.gate.is_assigned(job.order_id),
            state.config.poll_interval(),
            state.config.wave_timeout(),
        )
        .await;

        if waited == PollOutcome::Satisfied {
            return DispatchOutcome::Assigned;
        }
    }

    warn!(order_id = %job.order_id, "candidate list exhausted without assignment");
    DispatchOutcome::Exhausted
}
