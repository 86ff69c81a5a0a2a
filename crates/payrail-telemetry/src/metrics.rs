//! Prometheus metrics sink.

use prometheus::{
    proto::MetricFamily, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
};

use payrail_retry::{ErrorKind, RetryObserver};

use crate::error::TelemetryResult;

/// Injected metrics sink for the payment orchestrator.
///
/// Owns its registry; construct one per orchestrator and share it via
/// `Arc`. An external scrape collaborator calls [`Telemetry::gather`].
pub struct Telemetry {
    registry: Registry,
    payments_total: IntCounterVec,
    gateway_retries_total: IntCounterVec,
    subaccount_selections_total: IntCounterVec,
    operation_duration_seconds: HistogramVec,
}

impl Telemetry {
    pub fn new() -> TelemetryResult<Self> {
        let registry = Registry::new();

        let payments_total = IntCounterVec::new(
            Opts::new(
                "payrail_payments_total",
                "Payment operations by operation and mapped status",
            ),
            &["operation", "status"],
        )?;
        registry.register(Box::new(payments_total.clone()))?;

        let gateway_retries_total = IntCounterVec::new(
            Opts::new(
                "payrail_gateway_retries_total",
                "Gateway call retries by error kind",
            ),
            &["operation", "kind"],
        )?;
        registry.register(Box::new(gateway_retries_total.clone()))?;

        let subaccount_selections_total = IntCounterVec::new(
            Opts::new(
                "payrail_subaccount_selections_total",
                "Subaccount selections by subaccount id",
            ),
            &["subaccount"],
        )?;
        registry.register(Box::new(subaccount_selections_total.clone()))?;

        let operation_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "payrail_operation_duration_seconds",
                "Payment operation duration in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
            &["operation"],
        )?;
        registry.register(Box::new(operation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            payments_total,
            gateway_retries_total,
            subaccount_selections_total,
            operation_duration_seconds,
        })
    }

    pub fn record_payment(&self, operation: &str, status: &str) {
        self.payments_total
            .with_label_values(&[operation, status])
            .inc();
    }

    pub fn record_selection(&self, subaccount: &str) {
        self.subaccount_selections_total
            .with_label_values(&[subaccount])
            .inc();
    }

    pub fn observe_duration(&self, operation: &str, seconds: f64) {
        self.operation_duration_seconds
            .with_label_values(&[operation])
            .observe(seconds);
    }

    /// Metric families for an external scrape collaborator.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

impl RetryObserver for Telemetry {
    fn on_retry(&self, operation: &str, kind: ErrorKind, _attempt: u32) {
        self.gateway_retries_total
            .with_label_values(&[operation, kind.as_str()])
            .inc();
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let telemetry = Telemetry::new().unwrap();
        telemetry.record_payment("initialize", "SUCCESS");
        telemetry.record_payment("initialize", "SUCCESS");
        telemetry.record_payment("authorize", "FAILED");
        telemetry.record_selection("sub-a");
        telemetry.on_retry("charge", ErrorKind::RateLimited, 1);
        telemetry.observe_duration("initialize", 0.2);

        let families = telemetry.gather();
        let names: Vec<_> = families.iter().map(|f| f.get_name()).collect();
        assert!(names.contains(&"payrail_payments_total"));
        assert!(names.contains(&"payrail_gateway_retries_total"));
        assert!(names.contains(&"payrail_subaccount_selections_total"));
        assert!(names.contains(&"payrail_operation_duration_seconds"));
    }

    #[test]
    fn test_two_sinks_do_not_share_counters() {
        let a = Telemetry::new().unwrap();
        let b = Telemetry::new().unwrap();
        a.record_payment("initialize", "SUCCESS");
        let count = |t: &Telemetry| {
            t.gather()
                .iter()
                .filter(|f| f.get_name() == "payrail_payments_total")
                .flat_map(|f| f.get_metric())
                .map(|m| m.get_counter().get_value() as u64)
                .sum::<u64>()
        };
        assert_eq!(count(&a), 1);
        assert_eq!(count(&b), 0);
    }
}
