use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub dispatch_runs_total: IntCounterVec,
    pub dispatch_run_seconds: HistogramVec,
    pub notifications_sent_total: IntCounterVec,
    pub tasks_in_queue: IntGauge,
    pub couriers_tracked: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let dispatch_runs_total = IntCounterVec::new(
            Opts::new("dispatch_runs_total", "Dispatch runs by outcome"),
            &["outcome"],
        )
        .expect("valid dispatch_runs_total metric");

        let dispatch_run_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "dispatch_run_seconds",
                "Duration of dispatch runs in seconds",
            ),
            &["outcome"],
        )
        .expect("valid dispatch_run_seconds metric");

        let notifications_sent_total = IntCounterVec::new(
            Opts::new(
                "notifications_sent_total",
                "Push notifications sent by recipient role",
            ),
            &["recipient"],
        )
        .expect("valid notifications_sent_total metric");

        let tasks_in_queue = IntGauge::new(
            "tasks_in_queue",
            "Current number of tasks waiting in the worker pool queue",
        )
        .expect("valid tasks_in_queue metric");

        let couriers_tracked = IntGauge::new(
            "couriers_tracked",
            "Couriers with a known location in the geo index",
        )
        .expect("valid couriers_tracked metric");

        registry
            .register(Box::new(dispatch_runs_total.clone()))
            .expect("register dispatch_runs_total");
        registry
            .register(Box::new(dispatch_run_seconds.clone()))
            .expect("register dispatch_run_seconds");
        registry
            .register(Box::new(notifications_sent_total.clone()))
            .expect("register notifications_sent_total");
        registry
            .register(Box::new(tasks_in_queue.clone()))
            .expect("register tasks_in_queue");
        registry
            .register(Box::new(couriers_tracked.clone()))
            .expect("register couriers_tracked");

        Self {
            registry,
            dispatch_runs_total,
            dispatch_run_seconds,
            notifications_sent_total,
            tasks_in_queue,
            couriers_tracked,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
