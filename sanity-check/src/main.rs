use clap::{Parser, Subcommand};
use sanity_check::{
    build_transform, max_abs_diff, save_spectrum_svg, save_waveform_svg, StrategyArg,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use wavedft::generator::{sequence_of_tones, sum_of_tones};
use wavedft::parallel::DEFAULT_PARTITIONS;
use wavedft::{analyze, suggest_duration, synthesize, wav, DftError, DurationSuggestion, Signal};

/// Analyze and reconstruct WAV files with the wavedft transforms.
#[derive(Parser)]
#[command(author, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone, Copy)]
struct TransformArgs {
    /// Transform implementation
    #[arg(long, value_enum, default_value_t = StrategyArg::Parallel)]
    strategy: StrategyArg,

    /// Work units for the parallel strategy
    #[arg(long, default_value_t = DEFAULT_PARTITIONS)]
    partitions: usize,

    /// Worker threads for the parallel strategy (defaults to the CPU count)
    #[arg(long)]
    threads: Option<usize>,

    /// Chunk size used when suggesting power-of-two durations
    #[arg(long, default_value_t = 1024)]
    chunk: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Print the dominant frequency and save an amplitude chart
    Analyze {
        input: PathBuf,
        #[command(flatten)]
        transform: TransformArgs,
        /// Path of the SVG amplitude chart
        #[arg(long, default_value = "spectrum.svg")]
        svg_output: PathBuf,
    },
    /// Forward then inverse transform, writing the reconstructed WAV
    Roundtrip {
        input: PathBuf,
        #[command(flatten)]
        transform: TransformArgs,
        /// Directory for reconstructed.wav, spectrum.svg and waveform.svg
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Write a 16-bit mono WAV made of pure tones
    Generate {
        output: PathBuf,
        /// Tone frequencies in Hz
        #[arg(long = "freq", required = true, num_args = 1..)]
        frequencies: Vec<f64>,
        #[arg(long, default_value_t = 1.0)]
        seconds: f64,
        #[arg(long, default_value_t = 44100)]
        rate: u32,
        #[arg(long, default_value_t = 1024)]
        chunk: u32,
        /// Play the tones one after another instead of together
        #[arg(long)]
        sequence: bool,
    },
    /// Suggest durations whose sample count is a power of two
    Suggest {
        seconds: f64,
        #[arg(long, default_value_t = 44100)]
        rate: u32,
        #[arg(long, default_value_t = 1024)]
        chunk: u32,
    },
    /// Join WAV files with identical formats
    Concat {
        output: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn print_suggestion(seconds: f64, rate: u32, chunk: u32) -> Result<(), DftError> {
    match suggest_duration(seconds, rate, chunk)? {
        DurationSuggestion::Exact(s) => {
            println!("{s:.2} s already yields a power-of-two sample count")
        }
        DurationSuggestion::Candidates { shorter, longer } => {
            println!("use {shorter:.2} s or {longer:.2} s for a power-of-two sample count")
        }
    }
    Ok(())
}

fn hint_on_length(err: &DftError, signal: &Signal, chunk: u32) {
    if let DftError::NotPowerOfTwo { len } = err {
        eprintln!("fast strategy needs a power-of-two length, got {len}");
        if let Err(e) = print_suggestion(signal.duration(), signal.sample_rate, chunk) {
            log::warn!("no duration suggestion: {e}");
        }
    }
}

fn run_analyze(input: &Path, args: TransformArgs, svg_output: &Path) -> Result<(), Box<dyn Error>> {
    let signal = wav::read_signal(input)?;
    let transform = build_transform(args.strategy, args.partitions, args.threads)?;
    log::info!(
        "{} strategy on {} samples at {} Hz",
        transform.name(),
        signal.len(),
        signal.sample_rate
    );
    let analysis = analyze(&signal, transform.as_ref()).inspect_err(|e| {
        hint_on_length(e, &signal, args.chunk);
    })?;
    match analysis.peak() {
        Some((freq, amp)) => println!("peak: {freq:.2} Hz (amplitude {amp:.2})"),
        None => println!("no non-DC bins"),
    }
    save_spectrum_svg(&analysis.frequency, &analysis.amplitude, svg_output)?;
    println!("Saved {}", svg_output.display());
    Ok(())
}

fn run_roundtrip(input: &Path, args: TransformArgs, output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let signal = wav::read_signal(input)?;
    let transform = build_transform(args.strategy, args.partitions, args.threads)?;
    let analysis = analyze(&signal, transform.as_ref()).inspect_err(|e| {
        hint_on_length(e, &signal, args.chunk);
    })?;
    let reconstruction = synthesize(&analysis.spectrum, transform.as_ref(), true)?;

    match max_abs_diff(&signal.samples, &reconstruction.samples) {
        Some(diff) => println!("max sample difference: {diff}"),
        None => println!(
            "odd-length input: reconstructed {} of {} samples",
            reconstruction.samples.len(),
            signal.len()
        ),
    }

    std::fs::create_dir_all(output_dir)?;
    let wav_path = output_dir.join("reconstructed.wav");
    let clamped = wav::write_signal(&wav_path, &reconstruction.samples, signal.sample_rate)?;
    if clamped > 0 {
        log::warn!("{clamped} samples clamped to 16 bits");
    }
    save_spectrum_svg(
        &analysis.frequency,
        &analysis.amplitude,
        &output_dir.join("spectrum.svg"),
    )?;
    save_waveform_svg(
        &signal.time_axis(),
        &signal.samples,
        &output_dir.join("waveform.svg"),
    )?;
    println!("Saved reconstructed.wav, spectrum.svg and waveform.svg");
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            input,
            transform,
            svg_output,
        } => run_analyze(&input, transform, &svg_output)?,
        Command::Roundtrip {
            input,
            transform,
            output_dir,
        } => run_roundtrip(&input, transform, &output_dir)?,
        Command::Generate {
            output,
            frequencies,
            seconds,
            rate,
            chunk,
            sequence,
        } => {
            let samples = if sequence {
                sequence_of_tones(&frequencies, seconds, rate, chunk)?
            } else {
                sum_of_tones(&frequencies, seconds, rate, chunk)?
            };
            wav::write_pcm16(&output, &samples, rate, 1)?;
            println!("Wrote {} samples to {}", samples.len(), output.display());
        }
        Command::Suggest {
            seconds,
            rate,
            chunk,
        } => print_suggestion(seconds, rate, chunk)?,
        Command::Concat { output, inputs } => {
            wav::concatenate(&inputs, &output)?;
            println!("Wrote {}", output.display());
        }
    }
    Ok(())
}
