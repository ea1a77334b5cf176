use splitzy_domain::{CurrencyCode, PlannerContext, SessionId};
use std::env;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_CURRENCY_VAR: &str = "SPLITZY_DEFAULT_CURRENCY";
pub const SESSION_VAR: &str = "SPLITZY_SESSION";
const DEFAULT_SESSION: &str = "default";

/// Interpreter configuration, read from the environment and `.env`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub default_currency: CurrencyCode,
    /// Session used when a script has no `session` line.
    pub session: SessionId,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let default_currency = read(DEFAULT_CURRENCY_VAR)
            .map(CurrencyCode::new)
            .unwrap_or_default();
        let session = read(SESSION_VAR)
            .map(|value| SessionId::new(value.trim()))
            .unwrap_or_else(|| SessionId::new(DEFAULT_SESSION));

        Self {
            default_currency,
            session,
        }
    }

    pub fn planner_context(&self) -> PlannerContext {
        PlannerContext {
            default_currency: self.default_currency.clone(),
        }
    }
}

/// Logs go to stderr so reports on stdout stay clean. `RUST_LOG` overrides
/// the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
