use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use seedsweep_core::validate_positive_float;

#[derive(Parser, Debug)]
#[command(name = "seedsweep")]
#[command(about = "Expand a mesh global-seed sweep and build one mesh per seed")]
pub struct Cli {
    /// Path to the data directory holding config.yaml and the log (default: ~/.seedsweep/)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the parameter schema for the given seeds
    Schema {
        #[command(flatten)]
        seeds: SeedArgs,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// List every parameter set the schema expands to
    Expand {
        #[command(flatten)]
        source: SchemaSource,
    },
    /// Print the meshing journal for one seed
    Journal {
        /// Mesh element size
        #[arg(long, value_parser = validate_positive_float, allow_negative_numbers = true)]
        seed: f64,

        /// Export path written into the journal (default: <output_dir>/<stem>.e)
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Run the meshing tool once per parameter set
    Build {
        #[command(flatten)]
        source: SchemaSource,

        /// Directory for decks, journals and manifest (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Builds run at once (overrides config)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Write the default config file
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SeedArgs {
    /// Seed candidate, repeatable (default: 1.0 0.5 0.25 0.125)
    #[arg(
        short,
        long = "seed",
        value_parser = validate_positive_float,
        allow_negative_numbers = true
    )]
    pub seeds: Vec<f64>,
}

/// Seeds from the command line, or a schema file
#[derive(Args, Debug, Clone, Default)]
pub struct SchemaSource {
    #[command(flatten)]
    pub seeds: SeedArgs,

    /// JSON or YAML schema file, chosen by extension
    #[arg(long, conflicts_with = "seeds")]
    pub schema: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("seedsweep").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn seeds_are_validated_at_parse_time() {
        let cli = parse(&["schema", "--seed", "2.0", "--seed", "1"]).unwrap();
        match cli.command {
            Command::Schema { seeds, format } => {
                assert_eq!(seeds.seeds, vec![2.0, 1.0]);
                assert_eq!(format, Format::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_seed_is_rejected_with_literal_message() {
        let err = parse(&["schema", "--seed=-1.5"]).unwrap_err();
        assert!(err.to_string().contains("invalid positive float: '-1.5'"));
    }

    #[test]
    fn malformed_seed_is_rejected_with_literal_message() {
        let err = parse(&["journal", "--seed", "fine"]).unwrap_err();
        assert!(err.to_string().contains("invalid float value: 'fine'"));
    }

    #[test]
    fn zero_seed_is_accepted() {
        let cli = parse(&["journal", "--seed", "0.0"]).unwrap();
        assert!(matches!(cli.command, Command::Journal { seed, .. } if seed == 0.0));
    }

    #[test]
    fn schema_file_and_seeds_conflict() {
        assert!(parse(&["expand", "--schema", "s.json", "--seed", "1"]).is_err());
    }

    #[test]
    fn build_overrides() {
        let cli = parse(&["build", "-s", "0.5", "--jobs", "3", "-o", "/tmp/out"]).unwrap();
        match cli.command {
            Command::Build {
                source,
                output_dir,
                jobs,
            } => {
                assert_eq!(source.seeds.seeds, vec![0.5]);
                assert_eq!(output_dir, Some(PathBuf::from("/tmp/out")));
                assert_eq!(jobs, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
