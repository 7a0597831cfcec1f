use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "HESC CLI - Decode High Efficiency Structure Codec (.hesc) files into PDB or CSV.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE, -vvvv adds codec traces)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a HESC file and write its atoms as PDB or CSV.
    Decode(DecodeArgs),
    /// Print the header and a summary of a HESC file without writing atoms.
    Inspect(InspectArgs),
}

/// Text formats a decoded structure can be written in.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdb,
    Csv,
}

impl OutputFormat {
    /// Picks the format from an output file extension, defaulting to PDB.
    pub fn infer(output: Option<&Path>) -> Self {
        match output
            .and_then(Path::extension)
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Pdb,
        }
    }
}

/// Options shared by every command that decodes a file.
#[derive(Args, Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Path to a decoder configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Treat record length mismatches as errors instead of warnings.
    #[arg(long)]
    pub strict: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S max-group-atoms=4096
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Path to the input HESC file (raw or gzip-compressed).
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the output file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    pub options: DecodeOptions,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the input HESC file (raw or gzip-compressed).
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub options: DecodeOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_arguments_are_parsed() {
        let cli = Cli::parse_from([
            "hesc", "-vv", "decode", "in.hesc", "-o", "out.csv", "--strict", "-S",
            "max-group-atoms=10",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Decode(args) = cli.command else {
            panic!("Expected 'decode' subcommand");
        };
        assert_eq!(args.input, PathBuf::from("in.hesc"));
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.format, None);
        assert!(args.options.strict);
        assert_eq!(args.options.set_values, vec!["max-group-atoms=10".to_string()]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["hesc", "-q", "-v", "inspect", "in.hesc"]).is_err());
    }

    #[test]
    fn output_format_is_inferred_from_extension() {
        assert_eq!(OutputFormat::infer(Some(Path::new("a.CSV"))), OutputFormat::Csv);
        assert_eq!(OutputFormat::infer(Some(Path::new("a.pdb"))), OutputFormat::Pdb);
        assert_eq!(OutputFormat::infer(None), OutputFormat::Pdb);
    }
}
