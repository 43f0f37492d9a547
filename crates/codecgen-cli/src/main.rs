//! codecgen - generate JSON and YAML codecs for Go struct types.

use anyhow::{Result, anyhow};
use clap::Parser;
use codecgen::{GenerateOptions, GoPackage, generate};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod gofmt;

use config::CodecgenConfig;

/// Generate MarshalJSON/UnmarshalJSON and MarshalYAML/UnmarshalYAML methods
/// for a Go struct, with required-field checks on decode.
#[derive(Parser, Debug)]
#[command(name = "codecgen", version, about)]
struct Cli {
    /// Directory of the Go package
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Struct type to generate codecs for
    #[arg(long = "type", value_name = "NAME")]
    type_name: String,

    /// Struct type whose field types replace those of matching fields
    #[arg(long, value_name = "NAME")]
    field_override: Option<String>,

    /// Output file ("-" for stdout)
    #[arg(long, short, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Suffix of the generated wire type [default: JSON]
    #[arg(long)]
    suffix: Option<String>,

    /// Format the output with gofmt
    #[arg(long)]
    gofmt: bool,

    /// Print the wire record as JSON instead of Go code
    #[arg(long)]
    print_model: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = CodecgenConfig::load(&cli.dir)?;

    let out = cli.out.as_deref().filter(|path| *path != Path::new("-"));
    let mut package = GoPackage::load_excluding(&cli.dir, out)?;
    for (owner, name, underlying) in config.external_types()? {
        package.declare_external(&owner, &name, underlying);
    }

    let suffix = cli
        .suffix
        .clone()
        .unwrap_or_else(|| config.suffix().to_string());
    let mut options = GenerateOptions::new(&cli.type_name).with_suffix(suffix);
    if let Some(name) = &cli.field_override {
        options = options.with_override(name);
    }

    let generated = generate(&package, &options)?;
    let output = if cli.print_model {
        let mut json = serde_json::to_string_pretty(&generated.wire)?;
        json.push('\n');
        json
    } else if cli.gofmt || config.gofmt() {
        gofmt::format(&generated.code)
    } else {
        generated.code
    };

    write_output(cli.out.as_deref(), &output)
}

fn write_output(out: Option<&Path>, output: &str) -> Result<()> {
    match out {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, output)
                .map_err(|e| anyhow!("failed to write {}: {}", path.display(), e))?;
            tracing::debug!(path = %path.display(), "wrote output");
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
