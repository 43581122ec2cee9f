//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Geochain - geocoding with provider fallback
#[derive(Parser, Debug)]
#[command(
    name = "geochain",
    author,
    version,
    about = "Geocoding through an ordered chain of fallback providers",
    long_about = "Resolves addresses and coordinates by asking each configured provider \n\
                  in turn until one answers.\n\n\
                  Providers that run out of quota are skipped for the rest of the run, \n\
                  invalid credentials abort the lookup immediately."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "GEOCHAIN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "GEOCHAIN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an address to places
    Geocode(GeocodeArgs),

    /// Resolve coordinates to places
    Reverse(ReverseArgs),

    /// Geocode every address of a file and print statistics
    Batch(BatchArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `geocode` command
#[derive(Parser, Debug, Clone)]
pub struct GeocodeArgs {
    /// Address to resolve
    pub address: String,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "geochain.toml", env = "GEOCHAIN_CONFIG")]
    pub config: PathBuf,

    /// Maximum number of results, overrides chain.max_results
    #[arg(short, long, env = "GEOCHAIN_LIMIT")]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `reverse` command
#[derive(Parser, Debug, Clone)]
pub struct ReverseArgs {
    /// Latitude in decimal degrees
    #[arg(allow_hyphen_values = true)]
    pub latitude: f64,

    /// Longitude in decimal degrees
    #[arg(allow_hyphen_values = true)]
    pub longitude: f64,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "geochain.toml", env = "GEOCHAIN_CONFIG")]
    pub config: PathBuf,

    /// Maximum number of results, overrides chain.max_results
    #[arg(short, long, env = "GEOCHAIN_LIMIT")]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `batch` command
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "geochain.toml", env = "GEOCHAIN_CONFIG")]
    pub config: PathBuf,

    /// File with one address per line (blank lines and `#` comments are ignored)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Maximum number of results, overrides chain.max_results
    #[arg(short, long, env = "GEOCHAIN_LIMIT")]
    pub limit: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "GEOCHAIN_METRICS_PORT")]
    pub metrics_port: u16,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "geochain.toml", env = "GEOCHAIN_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "geochain.toml", env = "GEOCHAIN_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List the places served by static providers
    #[arg(long)]
    pub entries: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geocode() {
        let cli = Cli::try_parse_from([
            "geochain", "-v", "geocode", "Paris", "-c", "chain.toml", "--limit", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Geocode(args) => {
                assert_eq!(args.address, "Paris");
                assert_eq!(args.config, PathBuf::from("chain.toml"));
                assert_eq!(args.limit, Some(3));
                assert!(!args.json);
            }
            other => panic!("expected geocode, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_reverse_negative_coordinates() {
        let cli = Cli::try_parse_from(["geochain", "reverse", "-33.8688", "151.2093"]).unwrap();
        match cli.command {
            Commands::Reverse(args) => {
                assert_eq!(args.latitude, -33.8688);
                assert_eq!(args.longitude, 151.2093);
            }
            other => panic!("expected reverse, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["geochain", "-q", "-v", "info"]).is_err());
    }

    #[test]
    fn test_batch_requires_input() {
        assert!(Cli::try_parse_from(["geochain", "batch"]).is_err());
    }
}
