//! Plain-text rendering of the store and of country suggestions.

use std::io::{self, Write};

use trips_core::{Country, Trip, TripStore};

const HEADERS: [&str; 5] = ["ID", "NAME", "COUNTRY", "DATES", "NOTES"];

fn row(trip: &Trip) -> [String; 5] {
    [
        trip.id.map(|id| id.to_string()).unwrap_or_default(),
        trip.name.clone(),
        trip.country.clone(),
        format!("{} to {}", trip.start_date, trip.end_date),
        trip.notes.clone(),
    ]
}

/// Write the trip table, newest first, followed by the fetch error if any.
pub fn render_trips(store: &TripStore, out: &mut impl Write) -> io::Result<()> {
    if store.items().is_empty() {
        writeln!(out, "No trips yet.")?;
    } else {
        let rows: Vec<[String; 5]> = store.items().iter().map(row).collect();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for r in &rows {
            for (w, cell) in widths.iter_mut().zip(r) {
                *w = (*w).max(cell.chars().count());
            }
        }
        write_row(out, &HEADERS.map(String::from), &widths)?;
        for r in &rows {
            write_row(out, r, &widths)?;
        }
    }
    if let Some(error) = store.error() {
        writeln!(out, "error: {error}")?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String; 5], widths: &[usize; 5]) -> io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

pub fn render_countries(countries: &[Country], out: &mut impl Write) -> io::Result<()> {
    if countries.is_empty() {
        return writeln!(out, "No matching countries.");
    }
    for c in countries {
        writeln!(out, "{} {} ({})", c.flag, c.name, c.cca2)?;
    }
    Ok(())
}
