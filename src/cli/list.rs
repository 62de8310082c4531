use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use gedcheck::{Date, analysis, parser, report};
use regex::Regex;
use tracing::instrument;

use super::{parse_date, terminal};

#[derive(Debug, Parser)]
#[command(about = "Print one derived listing from a genealogy file")]
pub struct List {
    /// Path to the genealogy file
    file: PathBuf,

    /// The listing to print
    #[arg(value_enum)]
    listing: Listing,

    /// Filter rows by name (case-insensitive substring)
    #[arg(long, conflicts_with = "regex")]
    name: Option<String>,

    /// Filter rows by name (regular expression)
    #[arg(long)]
    regex: Option<String>,

    /// Reference date, e.g. '27 AUG 2026' (defaults to the system date)
    #[arg(long, value_parser = parse_date)]
    today: Option<Date>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Listing {
    /// Every individual with their derived age
    Ages,
    /// Individuals born in the last 30 days
    RecentBirths,
    /// Individuals who died in the last 30 days
    RecentDeaths,
    /// Living individuals with a birthday in the next 30 days
    UpcomingBirthdays,
    /// Living couples with a marriage anniversary in the next 30 days
    UpcomingAnniversaries,
    /// Children of each family, oldest first
    ChildrenByAge,
    /// Living individuals who are a spouse in some family
    LivingMarried,
    /// Living individuals over 30 who were never a spouse
    LivingSingle,
    /// Members of multiple-birth clusters (twins, triplets, ...)
    MultipleBirths,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let today = self
            .today
            .unwrap_or_else(|| Date::from_naive(chrono::Local::now().date_naive()));

        let mut store = parser::load(&self.file)?;
        analysis::run(&mut store, today);

        let mut entries = match self.listing {
            Listing::Ages => report::ages(&store),
            Listing::RecentBirths => report::recent_births(&store, today),
            Listing::RecentDeaths => report::recent_deaths(&store, today),
            Listing::UpcomingBirthdays => report::upcoming_birthdays(&store, today),
            Listing::UpcomingAnniversaries => report::upcoming_anniversaries(&store, today),
            Listing::ChildrenByAge => report::children_by_age(&store),
            Listing::LivingMarried => report::living_married(&store),
            Listing::LivingSingle => report::living_single(&store),
            Listing::MultipleBirths => report::multiple_births(&store),
        };

        if let Some(pattern) = &self.name {
            let needle = pattern.to_lowercase();
            entries.retain(|entry| entry.name.to_lowercase().contains(&needle));
        }
        if let Some(pattern) = &self.regex {
            let regex =
                Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))?;
            entries.retain(|entry| regex.is_match(&entry.name));
        }

        if entries.is_empty() {
            println!("No matches.");
            return Ok(());
        }

        let width = terminal::name_width();
        for entry in entries {
            println!(
                "{:<10} {:<width$} {}",
                entry.id.as_str(),
                terminal::fit_column(&entry.name, width),
                entry.detail
            );
        }

        Ok(())
    }
}
