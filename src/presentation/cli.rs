use std::path::PathBuf;
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use crate::application::MapRequest;
use crate::domain::{Continent, ContinentSelection};
use crate::infrastructure::ExchangeScan;

/// Generate Maidenhead grid square maps from contest logs.
///
/// One PNG is written per band found in the log. Cabrillo (.cbr, .log) and
/// CSV (.csv) logs are supported.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Contest log file
    #[arg(value_hint = ValueHint::FilePath)]
    pub filename: PathBuf,

    /// Continents to include (auto-detected per band if omitted)
    #[arg(long, value_enum, num_args = 1..)]
    pub continents: Vec<ContinentArg>,

    /// Directory the map images are written to
    #[arg(short, long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub output_dir: PathBuf,

    /// JSON file overriding the band plan, continent table, CSV columns or image size
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Look for grid squares in every Cabrillo QSO field, not only the exchange
    #[arg(long, action = ArgAction::SetTrue)]
    pub scan_all_fields: bool,

    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContinentArg {
    #[value(name = "north_america")]
    NorthAmerica,
    #[value(name = "south_america")]
    SouthAmerica,
    #[value(name = "europe")]
    Europe,
    #[value(name = "africa")]
    Africa,
    #[value(name = "asia")]
    Asia,
    #[value(name = "oceania")]
    Oceania,
}

impl From<ContinentArg> for Continent {
    fn from(arg: ContinentArg) -> Self {
        match arg {
            ContinentArg::NorthAmerica => Continent::NorthAmerica,
            ContinentArg::SouthAmerica => Continent::SouthAmerica,
            ContinentArg::Europe => Continent::Europe,
            ContinentArg::Africa => Continent::Africa,
            ContinentArg::Asia => Continent::Asia,
            ContinentArg::Oceania => Continent::Oceania,
        }
    }
}

impl Cli {
    /// Explicit continent filter, `None` when the user left it to auto-detection.
    pub fn continent_selection(&self) -> Option<ContinentSelection> {
        if self.continents.is_empty() {
            None
        } else {
            Some(self.continents.iter().copied().map(Continent::from).collect())
        }
    }

    pub fn exchange_scan(&self) -> ExchangeScan {
        if self.scan_all_fields {
            ExchangeScan::AllFields
        } else {
            ExchangeScan::default()
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn request(&self) -> MapRequest {
        MapRequest {
            input: self.filename.clone(),
            continents: self.continent_selection(),
            output_dir: self.output_dir.clone(),
        }
    }
}
