//! srdsp: block FIR filtering, spectra and interpolation of sampled time series.
//!
//! This is the main entry point for the command-line tool.

mod config;
mod data;
mod output;
mod pipeline;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib_dsp::fft::{magnitude_spectrum, power_spectrum};
use lib_dsp::interpolation::Interpolator;
use lib_dsp::window::{apply_window, WindowType};
use lib_types::units::Seconds;
use lib_types::waveform::Waveform;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "srdsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter every channel of a data file with an FIR kernel
    Filter {
        /// Path to the filter job configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Magnitude spectrum of one column
    Spectrum {
        /// Path to the data file
        input: PathBuf,

        /// Column to analyze (0-based)
        #[arg(long, default_value = "0")]
        column: usize,

        /// Window applied before the transform
        #[arg(long, default_value = "hann")]
        window: WindowType,

        /// Sample interval in seconds
        #[arg(long, default_value = "1.0")]
        sample_interval: f64,

        /// Report power (magnitude squared) instead of magnitude
        #[arg(long)]
        power: bool,

        /// Subtract the mean before windowing
        #[arg(long)]
        demean: bool,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upsample every column by an integer rate
    Interpolate {
        /// Path to the data file
        input: PathBuf,

        /// Interpolation rate
        #[arg(short, long)]
        rate: usize,

        /// Kernel half-length in input samples
        #[arg(long, default_value = "8")]
        design_factor: usize,

        /// Input samples per block
        #[arg(long, default_value = "256")]
        block_size: usize,

        /// Sample interval of the input in seconds
        #[arg(long, default_value = "1.0")]
        sample_interval: f64,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Filter { config, output } => {
            run_filter(&config, &output, cli.format)?;
        }
        Commands::Spectrum { input, column, window, sample_interval, power, demean, output } => {
            let options = SpectrumOptions { column, window, sample_interval, power, demean };
            compute_spectrum(&input, &options, output, cli.format)?;
        }
        Commands::Interpolate { input, rate, design_factor, block_size, sample_interval, output } => {
            interpolate(&input, rate, design_factor, block_size, sample_interval, output)?;
        }
    }

    Ok(())
}

fn run_filter(config_path: &Path, output_dir: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Loading configuration from {:?}", config_path);

    let config = config::load_config(config_path)?;
    let results = pipeline::run(&config)?;

    // Create output directory
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    output::write_results(&results, output_dir, format, &config.output)?;
    output::print_results(&results);

    tracing::info!("Filter job complete. Results written to {:?}", output_dir);
    Ok(())
}

struct SpectrumOptions {
    column: usize,
    window: WindowType,
    sample_interval: f64,
    power: bool,
    demean: bool,
}

fn compute_spectrum(
    input: &Path,
    options: &SpectrumOptions,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Computing spectrum of {:?} column {}", input, options.column);

    if options.sample_interval <= 0.0 || !options.sample_interval.is_finite() {
        anyhow::bail!("sample_interval must be positive, got {}", options.sample_interval);
    }

    let samples = data::read_column(input, options.column)?;
    let mut waveform = Waveform::new(samples, Seconds(options.sample_interval), Seconds::ZERO);
    if options.demean {
        waveform.demean();
    }
    apply_window(&mut waveform.samples, options.window);

    let (label, values) = if options.power {
        ("power", power_spectrum(&waveform.samples)?)
    } else {
        ("magnitude", magnitude_spectrum(&waveform.samples)?)
    };

    // Bins 0..=N/2 span DC to Nyquist
    let bin_spacing = waveform.nyquist().0 / (values.len() - 1) as f64;

    tracing::debug!(
        "Spectrum: samples={}, bins={}, window={}, sample_rate={} Hz",
        waveform.len(),
        values.len(),
        options.window,
        waveform.sample_rate().0
    );

    match output {
        Some(path) => {
            let mut f = std::io::BufWriter::new(std::fs::File::create(&path)?);
            output::write_spectrum(&mut f, label, &values, bin_spacing, format)?;
            f.flush()?;
            println!("Spectrum ({} bins) written to: {:?}", values.len(), path);
        }
        None => {
            let stdout = std::io::stdout();
            output::write_spectrum(&mut stdout.lock(), label, &values, bin_spacing, format)?;
        }
    }

    Ok(())
}

fn interpolate(
    input: &Path,
    rate: usize,
    design_factor: usize,
    block_size: usize,
    sample_interval: f64,
    output: Option<PathBuf>,
) -> Result<()> {
    tracing::info!("Interpolating {:?} by {}", input, rate);

    let columns = data::read_columns(input)?;
    let mut interpolator = Interpolator::<f64>::new(rate, design_factor, block_size)?;

    let mut upsampled = Vec::with_capacity(columns.len());
    for column in &columns {
        upsampled.push(interpolator.upsample(column)?);
    }

    let names: Vec<String> = (0..upsampled.len()).map(|i| format!("ch{}", i)).collect();
    let slices: Vec<&[f64]> = upsampled.iter().map(|c| c.as_slice()).collect();
    let dt = Seconds(sample_interval) / rate as f64;

    println!("Interpolated {} channels:", columns.len());
    println!("  Rate:          {}", rate);
    println!("  Kernel length: {}", interpolator.kernel_length());
    println!("  Samples:       {} -> {}", columns[0].len(), upsampled[0].len());

    if let Some(output_path) = output {
        let mut f = std::io::BufWriter::new(std::fs::File::create(&output_path)?);
        data::write_columns(&mut f, &names, &slices, dt, Seconds::ZERO)?;
        f.flush()?;
        println!("  Written to: {:?}", output_path);
    }

    Ok(())
}
