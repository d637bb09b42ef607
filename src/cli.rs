//! CLI argument definitions using clap.

use crate::config::AppConfig;
use crate::data::GenderColumn;
use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tobacco & alcohol prices vs. cancer incidence viewer
#[derive(Parser, Debug)]
#[command(
    name = "price-incidence",
    author,
    version,
    about = "Compare tobacco/alcohol price trends with cancer incidence",
    long_about = "Loads a price table and a cancer incidence table, joins them on year \n\
                  and shows the combined trends in an interactive window or as a report."
)]
pub struct Cli {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "PRICE_INCIDENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Price CSV (columns: product, year, price)
    #[arg(long, global = true, env = "PRICE_INCIDENCE_PRICE_CSV")]
    pub price: Option<PathBuf>,

    /// Cancer incidence CSV (columns: site, year, incidenceMale, incidenceFemale, incidenceTotal)
    #[arg(long, global = true, env = "PRICE_INCIDENCE_CANCER_CSV")]
    pub cancer: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum, global = true, env = "PRICE_INCIDENCE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive viewer (default)
    Gui,

    /// Run the pipeline once and print a report
    Report(ReportArgs),
}

/// Arguments for the `report` command
#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    /// Product to include (repeatable, or comma separated)
    #[arg(short, long = "product", value_delimiter = ',')]
    pub products: Vec<String>,

    /// Cancer site
    #[arg(short, long)]
    pub site: String,

    /// Incidence column to use
    #[arg(short, long, value_enum, default_value = "total")]
    pub gender: GenderColumn,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the charts to this PNG file
    #[arg(long)]
    pub png: Option<PathBuf>,
}

impl Cli {
    /// Apply command line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(price) = &self.price {
            config.data.price_csv = price.clone();
        }
        if let Some(cancer) = &self.cancer {
            config.data.cancer_csv = cancer.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["price-incidence"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_report_args() {
        let cli = Cli::try_parse_from([
            "price-incidence",
            "--price",
            "p.csv",
            "report",
            "--product",
            "Beer,Sake",
            "-p",
            "Cigarettes",
            "--site",
            "Lung",
            "--gender",
            "male",
            "--json",
        ])
        .unwrap();

        let Some(Commands::Report(args)) = &cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.products, vec!["Beer", "Sake", "Cigarettes"]);
        assert_eq!(args.site, "Lung");
        assert_eq!(args.gender, GenderColumn::Male);
        assert!(args.json);

        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.data.price_csv, PathBuf::from("p.csv"));
        assert_eq!(config.data.cancer_csv, PathBuf::from("cancer.csv"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["price-incidence", "-q", "-v"]).is_err());
    }
}
