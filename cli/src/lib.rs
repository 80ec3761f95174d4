//! Terminal view layer for the trips service.
//!
//! # Design
//! Each command loads the list first, the way the screen does on mount, then
//! runs its intent through the `Dispatcher` and renders the resulting store.
//! Rendering writes to any `io::Write` so tests can capture it.

pub mod render;
pub mod transport;

use std::io::Write;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::warn;
use trips_core::{
    ClientConfig, ConfigError, CountrySearch, Dispatcher, Transport, TripDraft, TripId, TripPatch,
    TripStore,
};

pub use transport::UreqTransport;

/// Manage trips stored by the trips API
#[derive(Parser, Debug)]
#[command(name = "trips", version)]
pub struct Cli {
    /// Base URL of the trips API [default: $TRIPS_API_URL, then http://localhost:8000]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// `--api-url` wins over the environment.
    pub fn config(&self) -> Result<ClientConfig, ConfigError> {
        match &self.api_url {
            Some(url) => ClientConfig::new(url),
            None => ClientConfig::from_env(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all trips, newest first
    List,
    /// Add a trip
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        country: String,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change fields of an existing trip
    Edit {
        id: TripId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a trip
    Rm { id: TripId },
    /// Suggest countries matching a query
    Countries { query: String },
}

/// Load the list the way the screen does on mount. A failed load is still
/// rendered so the error shows up before the command aborts.
fn load<T: Transport>(dispatcher: &Dispatcher<T>, out: &mut impl Write) -> anyhow::Result<TripStore> {
    let mut store = TripStore::new();
    if let Err(err) = dispatcher.fetch_all(&mut store) {
        render::render_trips(&store, out)?;
        return Err(err).context("could not load trips");
    }
    Ok(store)
}

/// Run `command` and write what the user should see to `out`.
pub fn run<T: Transport>(
    command: Command,
    dispatcher: &Dispatcher<T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let store = match command {
        Command::Countries { query } => {
            let mut search = CountrySearch::new();
            dispatcher.search_countries(&mut search, &query);
            render::render_countries(search.results(), out)?;
            return Ok(());
        }
        Command::List => load(dispatcher, out)?,
        Command::Add {
            name,
            country,
            start,
            end,
            notes,
        } => {
            let mut store = load(dispatcher, out)?;
            let draft = TripDraft {
                name,
                country,
                start_date: start,
                end_date: end,
                notes,
            };
            let trip = dispatcher
                .create(&mut store, &draft)
                .context("could not add trip")?;
            writeln!(out, "Added trip {}.", trip.id.unwrap_or_default())?;
            store
        }
        Command::Edit {
            id,
            name,
            country,
            start,
            end,
            notes,
        } => {
            let patch = TripPatch {
                name,
                country,
                start_date: start,
                end_date: end,
                notes,
            };
            if patch.is_empty() {
                bail!("nothing to change for trip {id}");
            }
            let mut store = load(dispatcher, out)?;
            let Some(current) = store.get(id) else {
                bail!("no trip with id {id}");
            };
            let draft = patch.apply_to(current);
            dispatcher
                .update(&mut store, id, &draft)
                .with_context(|| format!("could not update trip {id}"))?;
            writeln!(out, "Updated trip {id}.")?;
            store
        }
        Command::Rm { id } => {
            let mut store = load(dispatcher, out)?;
            if store.get(id).is_none() {
                warn!(id, "trip not in the loaded list");
            }
            dispatcher
                .delete(&mut store, id)
                .with_context(|| format!("could not delete trip {id}"))?;
            writeln!(out, "Deleted trip {id}.")?;
            store
        }
    };

    render::render_trips(&store, out)?;
    Ok(())
}
