use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ansible_graph::config::Config;
use ansible_graph::render::{Graphviz, ImageFormat};
use ansible_graph::report::ReportFormat;
use ansible_graph::runner::{RunOptions, Runner};

#[derive(Parser)]
#[command(name = "ansible-graph")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Directory and role dependency graphs plus reports for Ansible projects", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Report format
    #[arg(short, long, default_value = "default", value_parser = ["default", "xml", "json"])]
    report: String,

    /// Graph image format
    #[arg(short, long, default_value = "png", value_parser = ["svg", "png", "tif", "gif", "jpg"])]
    format: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Graphviz layout program
    #[arg(long, default_value = "dot")]
    dot: PathBuf,

    /// Path to the Ansible project
    project: PathBuf,

    /// Path to the configuration file
    config: PathBuf,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Checks that `path` can be opened for reading.
fn is_readable(path: &Path, directory: bool) -> bool {
    if directory {
        path.is_dir() && fs::read_dir(path).is_ok()
    } else {
        path.is_file() && File::open(path).is_ok()
    }
}

/// Runs the pipeline. Returns false if no report could be produced.
fn run(cli: &Cli) -> Result<bool> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("invalid configuration {}", cli.config.display()))?;

    let report_format: ReportFormat = cli.report.parse()?;
    let image_format: ImageFormat = cli.format.parse()?;

    let options = RunOptions::from_config(&cli.project, &config, report_format, image_format);
    let outcome = Runner::new(Graphviz::new(&cli.dot)).run(&options);

    if let Some(report) = &outcome.report {
        match &cli.output {
            Some(path) => {
                fs::write(path, report)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
                info!("Report written to {}", path.display());
            }
            None => println!("{}", report),
        }
    }

    Ok(outcome.report.is_some())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !is_readable(&cli.project, true) {
        error!("Cannot read project directory {}", cli.project.display());
        return ExitCode::from(1);
    }
    if !is_readable(&cli.config, false) {
        error!("Cannot read configuration file {}", cli.config.display());
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(1)
        }
    }
}
