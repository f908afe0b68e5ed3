use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(about, version, name = "oxel")]
/// Oxel OWL 2 EL reasoner
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
    /// Format of the log lines written to stderr
    ///
    /// The verbosity is set with the RUST_LOG environment variable and defaults to "warn".
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the class hierarchy
    ///
    /// Prints the equivalent classes and the direct subsumptions between
    /// named classes in OWL functional-style syntax.
    Classify {
        #[command(flatten)]
        input: InputOptions,
        /// File in which the taxonomy will be written
        ///
        /// If no file is given, stdout is used.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Check whether the ontology is consistent
    ///
    /// Prints "consistent" or "inconsistent".
    Consistency {
        #[command(flatten)]
        input: InputOptions,
    },
    /// Check whether a class can have instances
    ///
    /// Prints "satisfiable" or "unsatisfiable".
    Satisfiable {
        #[command(flatten)]
        input: InputOptions,
        /// IRI of the class to check
        #[arg(short, long, value_hint = ValueHint::Url)]
        class: String,
    },
    /// Compute the most specific types of the named individuals
    ///
    /// Prints them as class assertions in OWL functional-style syntax.
    Realize {
        #[command(flatten)]
        input: InputOptions,
        /// File in which the types will be written
        ///
        /// If no file is given, stdout is used.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
pub struct InputOptions {
    /// File to load the ontology from
    ///
    /// If no file is given, stdin is used as if it were the input file content.
    /// In this case, the content format must be specified using the --format option.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
    /// The format of the file to load
    ///
    /// It can be an extension like "ttl" or a MIME type like "text/turtle".
    ///
    /// By default, the format is guessed from the loaded file extension.
    #[arg(long, required_unless_present = "file")]
    pub format: Option<String>,
    /// Base IRI of the file to load
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
    /// Number of saturation workers
    ///
    /// By default, the available parallelism is used.
    #[arg(short, long)]
    pub workers: Option<usize>,
    /// Maximum time allowed for each reasoning stage, in seconds
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
    /// Print saturation statistics to stderr once done
    #[arg(long)]
    pub stats: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("the timeout must be a number of seconds: {e}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| e.to_string())
}
