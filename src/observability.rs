use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("llm_console.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("llm_console.client.request_errors");
pub(crate) static CLIENT_REQUEST_RETRIES: Counter = Counter::new("llm_console.client.retries");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("llm_console.client.request_duration_seconds");
pub(crate) static CLIENT_RETRY_BACKOFF: Moments =
    Moments::new("llm_console.client.retry_backoff_seconds");

pub(crate) static CONSOLE_TURNS: Counter = Counter::new("llm_console.console.turns");
pub(crate) static CONSOLE_TURN_ERRORS: Counter = Counter::new("llm_console.console.turn_errors");
pub(crate) static CONSOLE_RATE_LIMITED: Counter =
    Counter::new("llm_console.console.rate_limited");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_RETRIES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_moments(&CLIENT_RETRY_BACKOFF);

    collector.register_counter(&CONSOLE_TURNS);
    collector.register_counter(&CONSOLE_TURN_ERRORS);
    collector.register_counter(&CONSOLE_RATE_LIMITED);
}
