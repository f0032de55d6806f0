//! Command-line interface for xsdgen

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsdgen::{resolve_extensions_with, ClassContainer, ContainerDump, GeneratorConfig};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdgen")]
#[command(author, version, about = "Resolve class extensions ahead of code generation", long_about = None)]
struct Cli {
    /// Enable debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the extensions of a class graph dump
    Resolve {
        /// Path to the JSON class graph
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Generator configuration file
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty print the output, overriding the configuration
        #[arg(short, long)]
        pretty: bool,
    },

    /// Write a default configuration file
    #[command(name = "init-config")]
    InitConfig {
        /// Where to write the configuration
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            input,
            config,
            output,
            pretty,
        } => cmd_resolve(input, config, output, pretty),
        Commands::InitConfig { path } => cmd_init_config(path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "xsdgen=debug" } else { "xsdgen=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn cmd_resolve(
    input: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => GeneratorConfig::read(&path)?,
        None => GeneratorConfig::create(),
    };

    let text = fs::read_to_string(&input)?;
    let dump: ContainerDump = serde_json::from_str(&text)?;
    let mut container = ClassContainer::from_dump(dump)?;

    let summary = resolve_extensions_with(&mut container, config.extensions.order)?;

    let dump = container.to_dump();
    let json = if pretty || config.output.pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };

    match output {
        Some(path) => fs::write(&path, json + "\n")?,
        None => println!("{}", json),
    }

    eprintln!(
        "Resolved {} classes: {} retained, {} flattened, {} removed, {} native, {} missing",
        container.len(),
        summary.retained,
        summary.flattened,
        summary.removed,
        summary.native,
        summary.missing
    );

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_init_config(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    GeneratorConfig::create().write(&path)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
