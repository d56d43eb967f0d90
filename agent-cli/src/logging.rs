//! Initializes a global `tracing_subscriber` exactly once, mirroring `agent-core`'s own
//! `test_logging` ctor-based setup (SPEC_FULL.md §10.1).

use tracing_subscriber::EnvFilter;

pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()?;
    Ok(())
}
