//! Command-line interface implementation for Strata.
//! Provides argument parsing using clap.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::constants::TEMPLATES_ENV;

/// Command-line arguments structure for Strata.
#[derive(Parser, Debug)]
#[command(author, version, about = "Strata: layered project scaffolding from composable templates", long_about = None)]
pub struct Args {
    /// Templates to apply, in order
    #[arg(value_name = "TEMPLATE")]
    pub templates: Vec<String>,

    /// List the available templates and exit
    #[arg(short, long)]
    pub list: bool,

    /// Destination directory. Asked for when omitted
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Directory holding the templates
    #[arg(long = "templates", value_name = "DIR", env = TEMPLATES_ENV)]
    pub templates_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not run the templates' pre and post hooks
    #[arg(long)]
    pub no_hooks: bool,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}

/// Destination offered when none was given: template names joined by `_`,
/// followed by the date.
pub fn default_destination(templates: &[String], date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}_{}", templates.join("_"), date.format("%Y-%m-%d")))
}
