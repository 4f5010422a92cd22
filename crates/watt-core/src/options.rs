//! Process-wide runtime options read from the environment.
//!
//! Read once on first access; `on`, `ON`, `On`, and `1` enable a flag.

use std::sync::OnceLock;

/// Diagnostic toggles controlled by `CHARGE_TAIL_*` environment variables.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// `CHARGE_TAIL_STATISTICS` — periodically dump statistics counters.
    pub tail_statistics: bool,
    /// `CHARGE_TAIL_EXPERIMENT` — stream per-query experiment records.
    pub tail_experiment: bool,
    /// `CHARGE_TAIL_MEMORY` — log label memory high-water marks.
    pub tail_memory: bool,
}

fn is_on(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => value == "1" || value == "on" || value == "ON" || value == "On",
        Err(_) => false,
    }
}

impl Options {
    pub fn get() -> &'static Options {
        static OPTIONS: OnceLock<Options> = OnceLock::new();
        OPTIONS.get_or_init(|| Options {
            tail_statistics: is_on("CHARGE_TAIL_STATISTICS"),
            tail_experiment: is_on("CHARGE_TAIL_EXPERIMENT"),
            tail_memory: is_on("CHARGE_TAIL_MEMORY"),
        })
    }
}
