//! Command-line interface definitions for the Elo harvester.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Connection settings can also be provided via environment variables.

use clap::{Parser, ValueEnum};

/// Which sweep a run performs.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Reload the current season for every country (season-scoped replace).
    Current,
    /// Append the configured historical seasons for every country.
    History,
}

/// Command-line arguments for the Elo harvester.
///
/// # Examples
///
/// ```sh
/// # Reload the current season
/// elo_harvest --current-season 2023-2024
///
/// # Append the configured historical seasons
/// elo_harvest --mode history --database-url sqlite://elo.db
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Sweep to run
    #[arg(short, long, value_enum, default_value_t = Mode::Current)]
    pub mode: Mode,

    /// Season the site currently shows, formatted YYYY-YYYY
    #[arg(short = 's', long, default_value = "2023-2024")]
    pub current_season: String,

    /// Root URL of the source site
    #[arg(long, env = "ELO_BASE_URL", default_value = "http://elofootball.com/")]
    pub base_url: String,

    /// SQLite database the datasets are loaded into
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite://elo.db")]
    pub database_url: String,

    /// Directory the cumulative JSON snapshots are written to
    #[arg(short, long, default_value = "./output")]
    pub output_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["elo_harvest"]);
        assert_eq!(cli.mode, Mode::Current);
        assert_eq!(cli.current_season, "2023-2024");
        assert_eq!(cli.base_url, "http://elofootball.com/");
        assert_eq!(cli.output_dir, "./output");
    }

    #[test]
    fn test_cli_history_mode() {
        let cli = Cli::parse_from([
            "elo_harvest",
            "--mode",
            "history",
            "-s",
            "2024-2025",
            "-o",
            "/tmp/out",
        ]);
        assert_eq!(cli.mode, Mode::History);
        assert_eq!(cli.current_season, "2024-2025");
        assert_eq!(cli.output_dir, "/tmp/out");
    }
}
