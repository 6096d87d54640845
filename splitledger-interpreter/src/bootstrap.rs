use splitledger_application::{ConfigError, LedgerConfig, ReferencePolicy};
use std::{
    env::{self, VarError},
    io,
};
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter, util::SubscriberInitExt};

pub const REFERENCE_POLICY_VAR: &str = "SPLITLEDGER_REFERENCE_POLICY";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings read from the environment (and `.env`, when present).
#[derive(Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_policy_var(env::var(REFERENCE_POLICY_VAR))
    }

    fn from_policy_var(value: Result<String, VarError>) -> Result<Self, ConfigError> {
        let reference_policy = match value {
            Ok(value) => value.parse()?,
            Err(VarError::NotPresent) => ReferencePolicy::default(),
            Err(VarError::NotUnicode(_)) => {
                return Err(ConfigError::NotUnicode(REFERENCE_POLICY_VAR));
            }
        };

        Ok(Self {
            ledger: LedgerConfig { reference_policy },
        })
    }

    /// `--strict` on the command line wins over the environment.
    pub fn with_strict_override(mut self, strict: bool) -> Self {
        if strict {
            self.ledger.reference_policy = ReferencePolicy::Strict;
        }
        self
    }
}

/// Initialize logging and tracing.
///
/// Stdout carries the report, so events go to stderr. `RUST_LOG` overrides
/// the default `warn` filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    log_subscriber(filter, io::stderr).init();
}

fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish()
}
