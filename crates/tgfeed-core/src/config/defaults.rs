//! Default value functions used by serde for config deserialization.

pub fn default_base_url() -> String {
    "https://api.telegram.org".to_string()
}

pub fn default_poll_timeout() -> u64 {
    30
}

pub fn default_backoff_base_ms() -> u64 {
    1_000
}

pub fn default_backoff_cap_ms() -> u64 {
    60_000
}

pub fn default_queue_capacity() -> usize {
    64
}

pub fn default_true() -> bool {
    true
}
