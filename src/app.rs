//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the fitting pipeline
//! - prints the report and writes the requested artifacts

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `xsec-fit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = run_config_from_args(&cli);
    execute(&config)
}

/// Run the pipeline and produce every artifact enabled in `config`.
pub fn execute(config: &RunConfig) -> Result<(), AppError> {
    let run = pipeline::run_fit(config)?;
    let descriptor = &run.table.descriptor;

    if config.print {
        println!(
            "{}",
            crate::report::format_diff_table(descriptor.grid.name(), descriptor.composition.name(), &run.rows)
        );
    }

    if config.save || config.plot.is_some() {
        std::fs::create_dir_all(&config.output_dir).map_err(|e| {
            AppError::io(
                format!("Failed to create output directory '{}'", config.output_dir.display()),
                e,
            )
        })?;
    }

    if config.save {
        let path = config
            .output_dir
            .join(format!("{}.json", descriptor.output_stem()));
        let file = crate::io::curve::build_fit_file(descriptor, &run.table.samples, &run.fits);
        crate::io::curve::write_fit_json(&path, &file)?;
        info!("Wrote {} fits to {}", file.n_fits, path.display());
    }

    if let Some(path) = &config.plot {
        let data = crate::plot::build_plot_data(descriptor, &run.table.samples, &run.fits, &run.band)?;
        crate::plot::render_svg(path, &data)?;
        info!("Wrote plot to {}", path.display());
    }

    if let Some(path) = &config.export {
        crate::io::export::write_diff_csv(path, &run.rows, descriptor)?;
        info!("Wrote {} rows to {}", run.rows.len(), path.display());
    }

    Ok(())
}

pub fn run_config_from_args(cli: &Cli) -> RunConfig {
    let plot = if cli.no_plot {
        None
    } else {
        Some(cli.plot.clone().unwrap_or_else(|| default_plot_path(cli)))
    };

    RunConfig {
        grid: cli.grid.clone(),
        composition: cli.composition.clone(),
        input_dir: cli.input_dir.clone(),
        output_dir: cli.output_dir.clone(),
        weighting: cli.weighting,
        band_step: cli.step,
        print: !cli.no_print,
        save: !cli.no_save,
        plot,
        export: cli.export.clone(),
    }
}

fn default_plot_path(cli: &Cli) -> PathBuf {
    cli.output_dir
        .join(format!("{}_{}_13TeV.svg", cli.grid, cli.composition))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
