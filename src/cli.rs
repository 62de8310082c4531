use clap::ArgAction;
use gedcheck::Date;

mod check;
mod list;
mod terminal;

use check::Check;
use list::List;

/// Parse a reference date from a string.
///
/// This is a CLI boundary function: it accepts the same `DAY MONTH YEAR`
/// format the input files use, e.g. `27 AUG 2026`.
fn parse_date(s: &str) -> Result<Date, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Parse a genealogy file, print the report, and run all consistency
    /// checks
    Check(Check),

    /// Print one derived listing from a genealogy file
    List(List),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Check(command) => command.run()?,
            Self::List(command) => command.run()?,
        }
        Ok(())
    }
}
