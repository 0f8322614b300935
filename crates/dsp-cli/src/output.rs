//! Result output formatting and writing.

use crate::config::{OutputConfig, Precision};
use crate::data;
use crate::pipeline::FilterResults;
use crate::OutputFormat;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Write filter results to the output directory.
pub fn write_results(
    results: &FilterResults,
    output_dir: &Path,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    if config.waveforms {
        let wf_path = output_dir.join("filtered.csv");
        let mut f = std::io::BufWriter::new(std::fs::File::create(&wf_path)?);

        let names: Vec<String> = results.channels.iter().map(|c| format!("ch{}", c.index)).collect();
        let columns: Vec<&[f64]> = results.channels.iter().map(|c| c.waveform.samples.as_slice()).collect();
        if let Some(first) = results.channels.first() {
            data::write_columns(&mut f, &names, &columns, first.waveform.dt, first.waveform.t_start)?;
        }
        f.flush()?;

        tracing::info!("Wrote filtered waveforms to {:?}", wf_path);
    }

    if config.summary {
        let extension = match format {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        let summary_path = output_dir.join(format!("summary.{}", extension));
        let mut f = std::fs::File::create(&summary_path)?;
        write_summary(&mut f, results, format)?;

        tracing::info!("Wrote summary to {:?}", summary_path);
    }

    Ok(())
}

fn precision_name(precision: Precision) -> &'static str {
    match precision {
        Precision::Single => "single",
        Precision::Double => "double",
    }
}

/// Write the run summary in the requested format.
pub fn write_summary<W: Write>(f: &mut W, results: &FilterResults, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(f, "Filter Summary: {}", results.name)?;
            writeln!(f, "===============")?;
            writeln!(f, "Channels:       {}", results.channels.len())?;
            writeln!(f, "Input samples:  {}", results.input_samples)?;
            writeln!(f, "Kernel length:  {}", results.kernel_length)?;
            writeln!(f, "Block size:     {}", results.block_size)?;
            writeln!(f, "FFT size:       {}", results.fft_size)?;
            writeln!(f, "Precision:      {}", precision_name(results.precision))?;
            writeln!(f, "Layout:         {}", results.layout.name())?;
            writeln!(f, "Blocks emitted: {}", results.blocks_emitted)?;
            writeln!(f, "Elapsed:        {:.3} ms", results.elapsed.as_secs_f64() * 1e3)?;
            writeln!(f)?;
            writeln!(f, "channel  samples  input_rms     output_rms    output_peak")?;
            for c in &results.channels {
                writeln!(
                    f,
                    "{:<8} {:<8} {:<13.6} {:<13.6} {:.6}",
                    c.index,
                    c.waveform.len(),
                    c.input_rms,
                    c.output_rms,
                    c.output_peak
                )?;
            }
        }
        OutputFormat::Json => {
            let channels: Vec<serde_json::Value> = results
                .channels
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "index": c.index,
                        "samples": c.waveform.len(),
                        "input_rms": c.input_rms,
                        "output_rms": c.output_rms,
                        "output_peak": c.output_peak,
                    })
                })
                .collect();
            let json = serde_json::json!({
                "name": results.name,
                "input_samples": results.input_samples,
                "kernel_length": results.kernel_length,
                "block_size": results.block_size,
                "fft_size": results.fft_size,
                "precision": precision_name(results.precision),
                "layout": results.layout.name(),
                "blocks_emitted": results.blocks_emitted,
                "elapsed_ms": results.elapsed.as_secs_f64() * 1e3,
                "channels": channels,
            });
            writeln!(f, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(f, "channel,samples,input_rms,output_rms,output_peak")?;
            for c in &results.channels {
                writeln!(
                    f,
                    "{},{},{},{},{}",
                    c.index,
                    c.waveform.len(),
                    c.input_rms,
                    c.output_rms,
                    c.output_peak
                )?;
            }
        }
    }
    Ok(())
}

/// Write a spectrum, one row per bin. `label` names the value column.
pub fn write_spectrum<W: Write>(
    f: &mut W,
    label: &str,
    values: &[f64],
    bin_spacing: f64,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(f, "{:>6}  {:>14}  {:>14}", "bin", "frequency", label)?;
            for (k, m) in values.iter().enumerate() {
                writeln!(f, "{:>6}  {:>14.6}  {:>14.6e}", k, k as f64 * bin_spacing, m)?;
            }
        }
        OutputFormat::Json => {
            let bins: Vec<serde_json::Value> = values
                .iter()
                .enumerate()
                .map(|(k, m)| {
                    let mut bin = serde_json::json!({
                        "bin": k,
                        "frequency": k as f64 * bin_spacing,
                    });
                    bin[label] = serde_json::json!(m);
                    bin
                })
                .collect();
            writeln!(f, "{}", serde_json::to_string_pretty(&bins)?)?;
        }
        OutputFormat::Csv => {
            writeln!(f, "bin,frequency,{}", label)?;
            for (k, m) in values.iter().enumerate() {
                writeln!(f, "{},{},{}", k, k as f64 * bin_spacing, m)?;
            }
        }
    }
    Ok(())
}

/// Print a short run report to stdout.
pub fn print_results(results: &FilterResults) {
    println!("\n=== Filter Results: {} ===\n", results.name);
    println!("  Channels:   {}", results.channels.len());
    println!("  Kernel:     {} taps", results.kernel_length);
    println!("  Blocks:     {} x {} (nfft {})", results.blocks_emitted, results.block_size, results.fft_size);
    println!("  Elapsed:    {:.3} ms", results.elapsed.as_secs_f64() * 1e3);

    for c in &results.channels {
        println!(
            "  ch{}: rms {:.4} -> {:.4}, peak {:.4}",
            c.index, c.input_rms, c.output_rms, c.output_peak
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ChannelResult, EngineLayout};
    use lib_types::units::Seconds;
    use lib_types::waveform::Waveform;
    use std::time::Duration;

    fn results() -> FilterResults {
        FilterResults {
            name: "test".into(),
            layout: EngineLayout::Shared,
            precision: Precision::Double,
            block_size: 4,
            fft_size: 8,
            kernel_length: 3,
            input_samples: 4,
            blocks_emitted: 2,
            elapsed: Duration::from_millis(1),
            channels: vec![ChannelResult {
                index: 0,
                waveform: Waveform::new(vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0], Seconds(1.0), Seconds::ZERO),
                input_rms: 0.5,
                output_rms: 1.5,
                output_peak: 3.0,
            }],
        }
    }

    #[test]
    fn test_csv_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, &results(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "channel,samples,input_rms,output_rms,output_peak\n0,6,0.5,1.5,3\n");
    }

    #[test]
    fn test_json_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, &results(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["fft_size"], 8);
        assert_eq!(value["layout"], "shared");
        assert_eq!(value["channels"][0]["samples"], 6);
    }

    #[test]
    fn test_spectrum_csv() {
        let mut out = Vec::new();
        write_spectrum(&mut out, "magnitude", &[4.0, 0.5], 0.25, OutputFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "bin,frequency,magnitude\n0,0,4\n1,0.25,0.5\n");
    }

    #[test]
    fn test_spectrum_json_label() {
        let mut out = Vec::new();
        write_spectrum(&mut out, "power", &[16.0, 0.25], 0.5, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[1]["power"], 0.25);
        assert_eq!(value[1]["frequency"], 0.5);
        assert!(value[0].get("magnitude").is_none());
    }
}
