use std::path::PathBuf;

use clap::Parser;
use gedcheck::{Context, Date, Finding, GedcomStore, Sex, analysis, checks, parser, report};
use tracing::instrument;

use super::{parse_date, terminal};
use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Parse a genealogy file and run every consistency check")]
pub struct Check {
    /// Path to the genealogy file
    file: PathBuf,

    /// Reference date for age and "current date" checks, e.g. '27 AUG 2026'
    /// (defaults to the system date)
    #[arg(long, value_parser = parse_date)]
    today: Option<Date>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress the report; only the exit code reflects the findings
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let today = self
            .today
            .unwrap_or_else(|| Date::from_naive(chrono::Local::now().date_naive()));

        let mut store = parser::load(&self.file)?;
        analysis::run(&mut store, today);

        let context = Context { today };
        let findings = checks::run(&store, &context);

        if !self.quiet {
            match self.output {
                OutputFormat::Table => print_report(&store, &findings, today),
                OutputFormat::Json => print_json(&store, &findings)?,
                OutputFormat::Summary => println!("errors={}", findings.len()),
            }
        }

        // The run succeeds only when the rule engine found nothing.
        if !findings.is_empty() {
            std::process::exit(2);
        }

        Ok(())
    }
}

fn print_report(store: &GedcomStore, findings: &[Finding], today: Date) {
    let width = terminal::name_width();

    println!("Individuals ({}):", store.individual_count());
    for individual in store.individuals() {
        let name = individual
            .name
            .as_ref()
            .map_or("(unknown)", |n| n.value.as_str());
        let sex = match individual.sex() {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "?",
        };
        let birth = individual
            .birth
            .as_ref()
            .map_or_else(|| "birth unknown".to_string(), |b| format!("born {}", b.value));
        let age = individual
            .age
            .map_or_else(|| "age unknown".to_string(), |a| format!("age {a}"));
        println!(
            "  {:<10} {:<width$} {sex}  {birth}, {age}",
            individual.id.as_str(),
            terminal::fit_column(name, width),
        );
    }

    println!("\nFamilies ({}):", store.family_count());
    for family in store.families() {
        let spouse = |r: &Option<gedcheck::Sourced<gedcheck::Xref>>| {
            r.as_ref().map_or("-".to_string(), |s| s.value.to_string())
        };
        let married = family
            .marriage
            .as_ref()
            .map_or_else(|| "not married".to_string(), |m| format!("married {}", m.value));
        println!(
            "  {:<10} husband {}, wife {}, {married}, {} children",
            family.id.as_str(),
            spouse(&family.husband),
            spouse(&family.wife),
            family.children.len(),
        );
    }

    let sections: [(&str, Vec<report::Entry>); 7] = [
        ("Recent births", report::recent_births(store, today)),
        ("Recent deaths", report::recent_deaths(store, today)),
        ("Upcoming birthdays", report::upcoming_birthdays(store, today)),
        (
            "Upcoming anniversaries",
            report::upcoming_anniversaries(store, today),
        ),
        ("Living married", report::living_married(store)),
        ("Living single (over 30)", report::living_single(store)),
        ("Multiple births", report::multiple_births(store)),
    ];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for entry in entries {
            println!(
                "  {:<10} {:<width$} {}",
                entry.id.as_str(),
                terminal::fit_column(&entry.name, width),
                entry.detail
            );
        }
    }

    println!();
    if findings.is_empty() {
        println!("{}", "✅ No errors found.".success());
    } else {
        for finding in findings {
            let lines = finding
                .lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{} {} {}",
                format!("✗ {} (line {lines}):", finding.id).error(),
                finding.message,
                format!("[{}]", finding.rule).dim()
            );
        }
        println!(
            "\n{}",
            format!("Summary: {} errors found", findings.len()).warning()
        );
    }
}

fn print_json(store: &GedcomStore, findings: &[Finding]) -> anyhow::Result<()> {
    use serde_json::json;

    let output = json!({
        "status": if findings.is_empty() { "consistent" } else { "errors_found" },
        "individuals": store.individual_count(),
        "families": store.family_count(),
        "findings": findings,
        "total_errors": findings.len(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
