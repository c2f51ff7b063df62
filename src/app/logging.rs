use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt().with_env_filter(env_filter).with_target(false).try_init()
}
