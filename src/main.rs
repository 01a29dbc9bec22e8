//! Mini Memcache - connectivity probe
//!
//! Pings the configured memcached servers and reports, for every key given
//! on the command line, whether it exists.
//!
//! ```text
//! MEMCACHE_SERVERS=cache-a:11211,cache-b:11211 mini_memcache session:42
//! ```

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_memcache::{ClientBuilder, Config};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_memcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: servers={:?}, timeout={:?}, max_idle_conns={}",
        config.servers, config.timeout, config.max_idle_conns
    );

    let client = ClientBuilder::from_config(&config)
        .build()
        .context("failed to build memcache client")?;

    client.ping().context("memcache ping failed")?;
    info!("All servers answered ping");

    for key in std::env::args().skip(1) {
        match client.exists(&key) {
            Ok(found) => println!("{}\t{}", key, if found { "present" } else { "absent" }),
            Err(err) => warn!("Lookup of {} failed: {}", key, err),
        }
    }

    Ok(())
}
