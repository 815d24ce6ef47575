use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::Parser;

use gb_comm::{Group, LocalGroup};
use gb_core::TransformParams;
use gb_filter::BandQuantize;
use gb_run::{RunOutput, codec, pipeline, report};

#[derive(Parser, Debug)]
#[command(name = "gb_cli")]
#[command(about = "Split an image into row bands, transform each band on its own worker, and report per-worker telemetry")]
struct Cli {
    /// Smoothing strength of the bundled transform
    sigma: f32,
    /// Quantization step of the bundled transform
    k: f32,
    /// Minimum band height for smoothing to apply
    min_size: u32,
    /// Input image path
    input: PathBuf,
    /// Output image path
    output: PathBuf,
    /// Worker count; defaults to the CPU core count
    #[arg(long, default_value_t = num_cpus::get())]
    workers: usize,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    ensure!(cli.workers >= 1, "worker count must be at least 1");

    let params = TransformParams {
        sigma: cli.sigma,
        k: cli.k,
        min_size: cli.min_size,
    };

    // Decode before spawning the group: a decode failure must exit without
    // ever entering the transport phase.
    let input = codec::load_grid(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    tracing::info!(
        rows = input.desc().rows,
        cols = input.desc().cols,
        workers = cli.workers,
        "starting run"
    );

    let transform = BandQuantize;
    let input_ref = &input;
    let mut results = LocalGroup::run(cli.workers, |group| {
        let local = (group.rank() == pipeline::COORDINATOR).then(|| input_ref.clone());
        pipeline::run(&group, local, &transform, &params)
    });

    let coordinator = results.remove(0).context("coordinator rank failed")?;
    for worker in results {
        worker.context("worker rank failed")?;
    }
    let RunOutput { grid, report } = coordinator.context("coordinator produced no output")?;

    codec::save_grid(&cli.output, &grid)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    // Only the coordinator role ever prints the summary; worker ranks in
    // this process model produce no output at all.
    print!("{}", report::render(&report));
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
