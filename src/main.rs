//! Strata's main application entry point.
//! Handles command-line argument parsing and hands the requested templates
//! over to the applier.

use std::path::PathBuf;

use strata::{
    applier::{default_template_root, list_templates, TemplateApplier},
    cli::{default_destination, get_args, Args},
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    prompt::{DialoguerPrompter, Prompter},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nAborted.");
        std::process::exit(0);
    }) {
        log::debug!("Could not install interrupt handler: {e}");
    }

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Lists templates when asked to
/// 2. Resolves the destination directory, asking for it when missing
/// 3. Applies every requested template, in order
fn run(args: Args) -> Result<()> {
    let template_root = args.templates_dir.clone().unwrap_or_else(default_template_root);

    if args.list {
        let names = list_templates(&template_root).map_err(|e| {
            Error::ConfigError(format!(
                "cannot read template root '{}': {}",
                template_root.display(),
                e
            ))
        })?;
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    if args.templates.is_empty() {
        println!("No templates given, nothing to do.");
        return Ok(());
    }

    let renderer = MiniJinjaRenderer::new();
    let prompter = DialoguerPrompter::new();

    let dest_dir = match args.dest {
        Some(dest) => dest,
        None => {
            let default = default_destination(&args.templates, chrono::Local::now().date_naive());
            PathBuf::from(prompter.input("Destination directory", &default.display().to_string())?)
        }
    };

    let applier =
        TemplateApplier::new(&template_root, &renderer, &prompter, std::env::current_dir()?)
            .with_hooks(!args.no_hooks);
    applier.apply_all(&args.templates, &dest_dir)?;

    println!("Templates applied in {}.", dest_dir.display());
    Ok(())
}
