//! Command-line interface for jsonxml

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::Read;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use jsonxml::converters::{ConverterConfig, JsonToXml};
#[cfg(feature = "cli")]
use jsonxml::names::{derive_element_name, NameMode};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "jsonxml")]
#[command(author, version, about = "JSON to XML conversion tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a JSON (or JSONP) document to XML
    Convert {
        /// Path to the JSON file to convert (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Emit a fragment without the XML declaration
        #[arg(long)]
        fragment: bool,

        /// Only let ASCII keys name elements directly
        #[arg(long)]
        ascii_names: bool,

        /// Spaces per indentation level, 0 for a single line
        #[arg(long)]
        indent: Option<usize>,

        /// Converter configuration file (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the element name derived for each key
    Name {
        /// Keys to derive names for
        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,

        /// Only let ASCII keys name elements directly
        #[arg(long)]
        ascii_names: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            file,
            fragment,
            ascii_names,
            indent,
            config,
            output,
        } => cmd_convert(file, fragment, ascii_names, indent, config, output),
        Commands::Name { keys, ascii_names } => cmd_name(&keys, ascii_names),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn name_mode(ascii_names: bool) -> NameMode {
    if ascii_names {
        NameMode::Ascii
    } else {
        NameMode::Unicode
    }
}

#[cfg(feature = "cli")]
fn cmd_convert(
    file: Option<PathBuf>,
    fragment: bool,
    ascii_names: bool,
    indent: Option<usize>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => ConverterConfig::from_file(&path)?,
        None => ConverterConfig::new(),
    };
    if ascii_names {
        config = config.with_name_mode(name_mode(ascii_names));
    }
    if let Some(indent) = indent {
        config = config.with_indent(indent);
    }

    let input = match &file {
        Some(path) => {
            tracing::info!(path = %path.display(), "reading input");
            fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let xml = JsonToXml::with_config(config)?.convert(&input, !fragment)?;

    match output {
        Some(path) => {
            fs::write(&path, &xml)?;
            tracing::info!(path = %path.display(), bytes = xml.len(), "wrote output");
        }
        None => {
            print!("{}", xml);
            if fragment {
                println!();
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_name(keys: &[String], ascii_names: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mode = name_mode(ascii_names);

    for key in keys {
        let name = derive_element_name(key, mode);
        let marker = if name.fallback { "fallback" } else { "direct" };
        println!("{:?}\t<{}>\thandle={:?}\t{}", key, name.tag, name.handle, marker);
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
