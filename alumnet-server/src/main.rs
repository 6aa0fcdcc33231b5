use std::env;

use alumnet_server::{start_server, Config};
use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = Config::load()?;
    if let Some(port) = env::args().nth(1) {
        config.port = port
            .parse()
            .with_context(|| format!("Invalid port argument {port:?}"))?;
    }
    start_server(config).await
}
