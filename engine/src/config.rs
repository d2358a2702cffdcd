use std::time::Duration;

const DEBOUNCE_WINDOW_MS: u64 = 700;
const DEBOUNCE_WINDOW_MS_MIN: u64 = 50;
const DEBOUNCE_WINDOW_MS_MAX: u64 = 10_000;
const MAX_CAPABILITY_CALLS: u32 = 8;
const MAX_CAPABILITY_CALLS_MIN: u32 = 1;
const MAX_CAPABILITY_CALLS_MAX: u32 = 32;
const DEBOUNCE_WINDOW_MS_ENV: &str = "TALLY_DEBOUNCE_WINDOW_MS";
const MAX_CAPABILITY_CALLS_ENV: &str = "TALLY_ASSISTANT_MAX_CALLS";

/// Engine tunables. Defaults match the interactive behavior the product shipped
/// with; out-of-range environment overrides are clamped, never rejected.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Quiet window a field edit must survive before it is persisted.
    pub debounce_window: Duration,
    /// Capability calls allowed per user turn before the resolution loop aborts.
    pub max_capability_calls: u32,
}

impl EngineConfig {
    pub fn defaults() -> Self {
        Self {
            debounce_window: Duration::from_millis(DEBOUNCE_WINDOW_MS),
            max_capability_calls: MAX_CAPABILITY_CALLS,
        }
    }

    /// Reads overrides from the environment.
    pub fn from_env() -> Self {
        parse_config_from_raw(
            std::env::var(DEBOUNCE_WINDOW_MS_ENV).ok(),
            std::env::var(MAX_CAPABILITY_CALLS_ENV).ok(),
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

fn parse_env_u64_with_bounds(raw: Option<String>, min: u64, max: u64, default: u64) -> (u64, bool) {
    match raw.and_then(|value| value.parse::<u64>().ok()) {
        Some(parsed) => (parsed.clamp(min, max), true),
        None => (default, false),
    }
}

fn parse_env_u32_with_bounds(raw: Option<String>, min: u32, max: u32, default: u32) -> (u32, bool) {
    match raw.and_then(|value| value.parse::<u32>().ok()) {
        Some(parsed) => (parsed.clamp(min, max), true),
        None => (default, false),
    }
}

fn parse_config_from_raw(window_raw: Option<String>, calls_raw: Option<String>) -> EngineConfig {
    let (window_ms, window_set) = parse_env_u64_with_bounds(
        window_raw,
        DEBOUNCE_WINDOW_MS_MIN,
        DEBOUNCE_WINDOW_MS_MAX,
        DEBOUNCE_WINDOW_MS,
    );
    let (max_capability_calls, calls_set) = parse_env_u32_with_bounds(
        calls_raw,
        MAX_CAPABILITY_CALLS_MIN,
        MAX_CAPABILITY_CALLS_MAX,
        MAX_CAPABILITY_CALLS,
    );
    if window_set || calls_set {
        tracing::debug!(
            window_ms,
            max_capability_calls,
            "engine config overridden from environment"
        );
    }
    EngineConfig {
        debounce_window: Duration::from_millis(window_ms),
        max_capability_calls,
    }
}
