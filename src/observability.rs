use biometrics::{Collector, Counter, Moments};

pub(crate) static BRAIN_REQUESTS: Counter = Counter::new("blackbrain.client.requests");
pub(crate) static BRAIN_NETWORK_ERRORS: Counter = Counter::new("blackbrain.client.network_errors");
pub(crate) static BRAIN_SERVER_ERRORS: Counter = Counter::new("blackbrain.client.server_errors");
pub(crate) static BRAIN_UNKNOWN_ERRORS: Counter = Counter::new("blackbrain.client.unknown_errors");
pub(crate) static BRAIN_REQUEST_DURATION: Moments =
    Moments::new("blackbrain.client.request_duration_seconds");

pub(crate) static AUTH_REQUESTS: Counter = Counter::new("blackbrain.auth.requests");
pub(crate) static AUTH_FAILURES: Counter = Counter::new("blackbrain.auth.failures");

pub(crate) static SESSION_SUBMITS: Counter = Counter::new("blackbrain.session.submits");
pub(crate) static SESSION_DROPPED_EMPTY: Counter = Counter::new("blackbrain.session.dropped_empty");
pub(crate) static SESSION_DROPPED_BUSY: Counter = Counter::new("blackbrain.session.dropped_busy");
pub(crate) static SESSION_ANSWERS: Counter = Counter::new("blackbrain.session.answers");
pub(crate) static SESSION_FAILURES: Counter = Counter::new("blackbrain.session.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&BRAIN_REQUESTS);
    collector.register_counter(&BRAIN_NETWORK_ERRORS);
    collector.register_counter(&BRAIN_SERVER_ERRORS);
    collector.register_counter(&BRAIN_UNKNOWN_ERRORS);
    collector.register_moments(&BRAIN_REQUEST_DURATION);

    collector.register_counter(&AUTH_REQUESTS);
    collector.register_counter(&AUTH_FAILURES);

    collector.register_counter(&SESSION_SUBMITS);
    collector.register_counter(&SESSION_DROPPED_EMPTY);
    collector.register_counter(&SESSION_DROPPED_BUSY);
    collector.register_counter(&SESSION_ANSWERS);
    collector.register_counter(&SESSION_FAILURES);
}
