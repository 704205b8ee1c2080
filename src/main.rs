use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use emphasize::OutputFormat;

#[derive(Parser)]
#[command(name = "emphasize")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve emphasis in djot-style inline markup")]
struct Cli {
    /// Input file (stdin if not provided)
    file: Option<PathBuf>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format, overriding the config file
    #[arg(long, value_enum)]
    to: Option<OutputFormat>,

    /// Write output to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let start_dir = start_dir_for(&cli.file)?;
    let (cfg, cfg_path) = emphasize::config::load(cli.config.as_deref(), &start_dir)?;
    if let Some(path) = &cfg_path {
        log::debug!("Using config {}", path.display());
    }

    let input = read_all(cli.file.as_ref())?;
    let format = cli.to.or(cfg.output).unwrap_or_default();
    let output = match format {
        OutputFormat::Html => emphasize::render(&input, Some(cfg)),
        OutputFormat::Json => {
            let events = emphasize::document_events(&input);
            let mut json = serde_json::to_string_pretty(&events).map_err(io::Error::other)?;
            json.push('\n');
            json
        }
        OutputFormat::Tree => {
            let tree = emphasize::parse_document(&input);
            let dump = format!("{tree:#?}");
            emphasize::syntax::release(tree);
            dump
        }
    };

    if let Some(path) = &cli.output {
        fs::write(path, &output)?;
        log::info!("Wrote {}", path.display());
    } else {
        print!("{output}");
    }

    Ok(())
}
