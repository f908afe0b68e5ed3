#![expect(clippy::print_stderr, clippy::print_stdout)]

mod cli;

use crate::cli::{Args, Command, InputOptions, LogFormat};
use anyhow::{Context, bail};
use clap::Parser;
use oxel::loading::{rdf_format_from_name, rdf_format_from_path};
use oxel::{Axiom, OntologyLoader, OwlClass, Reasoner, ReasonerConfig, ReasonerError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write, stdin, stdout};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);
    match args.command {
        Command::Classify { input, output } => {
            let mut reasoner = load(&input)?;
            let result = reasoner.classify().map(|taxonomy| taxonomy.class_axioms());
            print_statistics(&reasoner, &input);
            let axioms = result.map_err(reasoning_error)?;
            write_axioms(&axioms, output.as_deref())
        }
        Command::Consistency { input } => {
            let mut reasoner = load(&input)?;
            let result = reasoner.is_inconsistent();
            print_statistics(&reasoner, &input);
            let inconsistent = result.map_err(reasoning_error)?;
            println!("{}", if inconsistent { "inconsistent" } else { "consistent" });
            Ok(())
        }
        Command::Satisfiable { input, class } => {
            let class = OwlClass::from_iri(class.as_str())
                .with_context(|| format!("Invalid class IRI {class}"))?;
            let mut reasoner = load(&input)?;
            let result = reasoner.is_satisfiable(&class);
            print_statistics(&reasoner, &input);
            let satisfiable = result.map_err(reasoning_error)?;
            println!("{}", if satisfiable { "satisfiable" } else { "unsatisfiable" });
            Ok(())
        }
        Command::Realize { input, output } => {
            let mut reasoner = load(&input)?;
            let result = reasoner.realize().map(|taxonomy| taxonomy.instance_axioms());
            print_statistics(&reasoner, &input);
            let axioms = result.map_err(reasoning_error)?;
            write_axioms(&axioms, output.as_deref())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load(input: &InputOptions) -> anyhow::Result<Reasoner> {
    let format = if let Some(format) = &input.format {
        rdf_format_from_name(format)?
    } else if let Some(file) = &input.file {
        rdf_format_from_path(file).with_context(|| {
            format!(
                "Not able to guess the file format of {}, please use --format",
                file.display()
            )
        })?
    } else {
        bail!("The --format option must be set when loading from stdin")
    };
    let mut config = ReasonerConfig::default().with_timeout(input.timeout);
    if let Some(workers) = input.workers {
        config = config.with_workers(workers);
    }
    let mut loader = OntologyLoader::new(format).with_buffer_size(config.loader_buffer);
    if let Some(base) = &input.base {
        loader = loader
            .with_base_iri(base.as_str())
            .with_context(|| format!("Invalid base IRI {base}"))?;
    }
    let reasoner = if let Some(file) = &input.file {
        let reader = BufReader::new(
            File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
        );
        Reasoner::load_with(&loader, reader, config)
            .with_context(|| format!("Failed to load {}", file.display()))?
    } else {
        Reasoner::load_with(&loader, stdin().lock(), config)
            .context("Failed to load the ontology from stdin")?
    };
    if let Some(report) = reasoner.loading_report() {
        let skipped = report.skipped_total();
        if skipped > 0 {
            eprintln!("{skipped} axioms outside of OWL 2 EL were ignored");
        }
    }
    Ok(reasoner)
}

fn reasoning_error(error: ReasonerError) -> anyhow::Error {
    match error {
        ReasonerError::Inconsistent => {
            anyhow::Error::new(error).context("The ontology has no model")
        }
        ReasonerError::Timeout(_) => anyhow::Error::new(error).context("Reasoning stopped"),
        error => error.into(),
    }
}

fn print_statistics(reasoner: &Reasoner, input: &InputOptions) {
    if input.stats {
        eprint!("{}", reasoner.statistics());
    }
}

fn write_axioms(axioms: &[Axiom], output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(output) = output {
        let mut writer = BufWriter::new(
            File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?,
        );
        write_lines(axioms, &mut writer)?;
        close_file_writer(writer)?;
    } else {
        let mut writer = stdout().lock();
        write_lines(axioms, &mut writer)?;
        writer.flush()?;
    }
    Ok(())
}

fn write_lines(axioms: &[Axiom], writer: &mut impl Write) -> io::Result<()> {
    for axiom in axioms {
        writeln!(writer, "{axiom}")?;
    }
    Ok(())
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}
