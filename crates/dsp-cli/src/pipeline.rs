//! Filter job orchestration.

use crate::config::{FilterConfig, Precision, ProcessingParams};
use crate::data;
use anyhow::{Context, Result};
use lib_dsp::convolution::OverlapAdd;
use lib_dsp::float::DftFloat;
use lib_types::waveform::Waveform;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// How the engines of a run were arranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineLayout {
    /// One master transform shared by every channel on one thread.
    Shared,
    /// One engine per channel, sequential.
    Independent,
    /// One engine per channel on the rayon pool.
    Parallel,
}

impl EngineLayout {
    pub fn from_params(params: &ProcessingParams) -> Self {
        if params.parallel {
            Self::Parallel
        } else if params.share_transform {
            Self::Shared
        } else {
            Self::Independent
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Independent => "independent",
            Self::Parallel => "parallel",
        }
    }
}

/// Filtered output of one channel.
#[derive(Clone, Debug)]
pub struct ChannelResult {
    pub index: usize,
    pub waveform: Waveform,
    pub input_rms: f64,
    pub output_rms: f64,
    pub output_peak: f64,
}

/// Results of a filter run.
#[derive(Clone, Debug)]
pub struct FilterResults {
    pub name: String,
    pub layout: EngineLayout,
    pub precision: Precision,
    pub block_size: usize,
    pub fft_size: usize,
    pub kernel_length: usize,
    pub input_samples: usize,
    pub blocks_emitted: u64,
    pub elapsed: Duration,
    pub channels: Vec<ChannelResult>,
}

/// Output of [`filter_channels`]: samples per channel plus engine sizing.
#[derive(Clone, Debug)]
pub struct FilteredChannels {
    pub outputs: Vec<Vec<f64>>,
    pub fft_size: usize,
    pub blocks_emitted: u64,
}

/// Load inputs, filter every channel and collect the results.
pub fn run(config: &FilterConfig) -> Result<FilterResults> {
    tracing::info!("Starting filter job: {}", config.name);

    let channels = data::read_columns(&config.input)?;
    let kernel = load_kernel(config)?;
    let layout = EngineLayout::from_params(&config.processing);

    tracing::info!(
        "{} channels x {} samples, dt={} ms, kernel_len={}, block_size={}, layout={}",
        channels.len(),
        channels[0].len(),
        config.dt().as_ms(),
        kernel.len(),
        config.processing.block_size,
        layout.name()
    );

    let start = Instant::now();
    let filtered = filter_channels(&channels, &kernel, &config.processing)?;
    let elapsed = start.elapsed();

    let dt = config.dt();
    let results: Vec<ChannelResult> = channels
        .iter()
        .zip(filtered.outputs)
        .enumerate()
        .map(|(index, (input, output))| {
            let input = Waveform::new(input.clone(), dt, lib_types::units::Seconds::ZERO);
            let waveform = Waveform::new(output, dt, input.t_start);
            ChannelResult {
                index,
                input_rms: input.rms(),
                output_rms: waveform.rms(),
                output_peak: waveform.max_abs(),
                waveform,
            }
        })
        .collect();

    tracing::info!("Filtered {} channels in {:?}", results.len(), elapsed);

    Ok(FilterResults {
        name: config.name.clone(),
        layout,
        precision: config.processing.precision,
        block_size: config.processing.block_size,
        fft_size: filtered.fft_size,
        kernel_length: kernel.len(),
        input_samples: channels[0].len(),
        blocks_emitted: filtered.blocks_emitted,
        elapsed,
        channels: results,
    })
}

fn load_kernel(config: &FilterConfig) -> Result<Vec<f64>> {
    match &config.kernel.file {
        Some(path) => data::read_column(path, 0).context("Failed to load kernel"),
        None => Ok(config.kernel.coefficients.clone()),
    }
}

/// Filter each channel with `kernel` in the configured precision and layout.
pub fn filter_channels(
    channels: &[Vec<f64>],
    kernel: &[f64],
    params: &ProcessingParams,
) -> Result<FilteredChannels> {
    match params.precision {
        Precision::Double => filter_typed::<f64>(channels, kernel, params),
        Precision::Single => filter_typed::<f32>(channels, kernel, params),
    }
}

fn filter_typed<T: DftFloat>(
    channels: &[Vec<f64>],
    kernel: &[f64],
    params: &ProcessingParams,
) -> Result<FilteredChannels> {
    let kernel: Vec<T> = kernel.iter().map(|&v| T::cast(v)).collect();
    let inputs: Vec<Vec<T>> = channels
        .iter()
        .map(|c| c.iter().map(|&v| T::cast(v)).collect())
        .collect();

    let (outputs, fft_size, blocks_emitted) = match EngineLayout::from_params(params) {
        EngineLayout::Shared => filter_shared(&inputs, &kernel, params)?,
        EngineLayout::Independent => {
            let mut outputs = Vec::with_capacity(inputs.len());
            let mut fft_size = 0;
            let mut blocks = 0;
            for input in &inputs {
                let mut engine = OverlapAdd::new(&kernel, params.block_size)?;
                outputs.push(stream(&mut engine, input, params.flush)?);
                fft_size = engine.fft_size();
                blocks += engine.blocks_emitted();
            }
            (outputs, fft_size, blocks)
        }
        EngineLayout::Parallel => {
            // Engines hold thread-local transforms, so each task builds its own
            let per_channel: Vec<(Vec<T>, usize, u64)> = inputs
                .par_iter()
                .map(|input| -> Result<(Vec<T>, usize, u64)> {
                    let mut engine = OverlapAdd::new(&kernel, params.block_size)?;
                    let output = stream(&mut engine, input, params.flush)?;
                    Ok((output, engine.fft_size(), engine.blocks_emitted()))
                })
                .collect::<Result<Vec<_>>>()?;

            let fft_size = per_channel.first().map_or(0, |c| c.1);
            let blocks = per_channel.iter().map(|c| c.2).sum::<u64>();
            (per_channel.into_iter().map(|c| c.0).collect(), fft_size, blocks)
        }
    };

    Ok(FilteredChannels {
        outputs: outputs
            .into_iter()
            .map(|o| o.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect())
            .collect(),
        fft_size,
        blocks_emitted,
    })
}

/// Master engine on channel 0, slaves on the rest, advanced block by block.
fn filter_shared<T: DftFloat>(
    inputs: &[Vec<T>],
    kernel: &[T],
    params: &ProcessingParams,
) -> Result<(Vec<Vec<T>>, usize, u64)> {
    let master = OverlapAdd::new(kernel, params.block_size)?;
    let mut engines = Vec::with_capacity(inputs.len());
    for _ in 1..inputs.len() {
        engines.push(OverlapAdd::slave(kernel, &master)?);
    }
    engines.insert(0, master);

    let bs = params.block_size;
    let len = inputs.iter().map(|i| i.len()).max().unwrap_or(0);
    let plan = BlockPlan::new(len, kernel.len(), bs, params.flush);

    let mut outputs = vec![vec![T::zero(); plan.blocks * bs]; inputs.len()];
    let mut block = vec![T::zero(); bs];

    for b in 0..plan.blocks {
        for ((engine, input), output) in engines.iter_mut().zip(inputs).zip(outputs.iter_mut()) {
            let out = &mut output[b * bs..(b + 1) * bs];
            if b < plan.input_blocks {
                fill_block(&mut block, input, b * bs);
                engine.filter(&block, out)?;
            } else {
                engine.flush(out)?;
            }
        }
    }

    for output in outputs.iter_mut() {
        output.truncate(plan.output_len);
    }

    let fft_size = engines[0].fft_size();
    let blocks = engines.iter().map(|e| e.blocks_emitted()).sum::<u64>();
    Ok((outputs, fft_size, blocks))
}

/// Stream one signal through `engine`, optionally draining the tail.
pub fn stream<T: DftFloat>(engine: &mut OverlapAdd<T>, signal: &[T], flush: bool) -> Result<Vec<T>> {
    let bs = engine.block_size();
    let plan = BlockPlan::new(signal.len(), engine.kernel_length(), bs, flush);

    let mut output = vec![T::zero(); plan.blocks * bs];
    let mut block = vec![T::zero(); bs];

    for (b, out) in output.chunks_exact_mut(bs).enumerate() {
        if b < plan.input_blocks {
            fill_block(&mut block, signal, b * bs);
            engine.filter(&block, out)?;
        } else {
            engine.flush(out)?;
        }
    }

    output.truncate(plan.output_len);
    Ok(output)
}

/// Block counts for streaming `len` samples.
struct BlockPlan {
    input_blocks: usize,
    blocks: usize,
    output_len: usize,
}

impl BlockPlan {
    fn new(len: usize, kernel_len: usize, block_size: usize, flush: bool) -> Self {
        let input_blocks = len.div_ceil(block_size);
        let output_len = if flush { len + kernel_len - 1 } else { len };
        Self {
            input_blocks,
            blocks: output_len.div_ceil(block_size).max(input_blocks),
            output_len,
        }
    }
}

/// Copy `signal[start..start + block.len()]` into `block`, zero-padding past the end.
fn fill_block<T: DftFloat>(block: &mut [T], signal: &[T], start: usize) {
    let end = (start + block.len()).min(signal.len()).max(start);
    let n = end - start;
    if n > 0 {
        block[..n].copy_from_slice(&signal[start..end]);
    }
    block[n..].fill(T::zero());
}
