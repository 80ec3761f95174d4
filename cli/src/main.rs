//! `trips` binary.
//!
//! # Usage
//!
//! ```bash
//! trips list
//! trips add --name Paris --country France --start 2024-05-01 --end 2024-05-07
//! trips edit 3 --notes "Louvre on Monday"
//! trips rm 3
//! trips countries united
//! TRIPS_API_URL=http://staging:8000 trips list
//! ```

use std::io;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trips_cli::{run, Cli, UreqTransport};
use trips_core::{Dispatcher, TripClient};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let dispatcher = Dispatcher::new(TripClient::from_config(&config), UreqTransport::new());

    let stdout = io::stdout();
    run(cli.command, &dispatcher, &mut stdout.lock())
}
