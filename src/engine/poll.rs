use std::time::Duration;

use tokio::time::{Instant, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Satisfied,
    TimedOut,
}

/// Cancellation-by-observation: re-checks `condition` every `interval` up to
/// `max_wait`, returning the moment it holds instead of sleeping the full
/// timeout.
pub async fn poll_until<F>(mut condition: F, interval: Duration, max_wait: Duration) -> PollOutcome
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + max_wait;

    loop {
        if condition() {
            return PollOutcome::Satisfied;
        }

        let now = Instant::now();
        if now >= deadline {
            return PollOutcome::TimedOut;
        }

        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{PollOutcome, poll_until};

    #[tokio::test(start_paused = true)]
    async fn satisfied_immediately_without_sleeping() {
        let started = Instant::now();
        let outcome = poll_until(
            || true,
            Duration::from_millis(200),
            Duration::from_secs(8),
        )
        .await;

        assert_eq!(outcome, PollOutcome::Satisfied);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_max_wait() {
        let started = Instant::now();
        let outcome = poll_until(
            || false,
            Duration::from_millis(200),
            Duration::from_secs(8),
        )
        .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn observes_condition_within_one_interval() {
        let flag = Arc::new(AtomicBool::new(false));

        let waiter = {
            let flag = flag.clone();
            tokio::spawn(async move {
                let started = Instant::now();
                let outcome = poll_until(
                    move || flag.load(Ordering::SeqCst),
                    Duration::from_millis(200),
                    Duration::from_secs(8),
                )
                .await;
                (outcome, started.elapsed())
            })
        };

        tokio::time::sleep(Duration::from_millis(500)).await;
        flag.store(true, Ordering::SeqCst);

        let (outcome, elapsed) = waiter.await.unwrap();
        assert_eq!(outcome, PollOutcome::Satisfied);
        // Set at 500ms: the 600ms tick is the first to observe it.
        assert!(elapsed <= Duration::from_millis(700));
    }
}
