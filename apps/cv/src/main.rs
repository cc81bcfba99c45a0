use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use systematic_cv::cli::{self, Cli};
use systematic_cv::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (.env, then process environment)
    let config = Config::from_env()?;

    // Initialize structured logging; stdout stays free for preview output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("systematic_cv={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Starting systematic-cv v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli, &config)
}
