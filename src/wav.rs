use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::path::{Path, PathBuf};

use hound::{SampleFormat as HoundFormat, WavReader, WavSpec, WavWriter};

use crate::error::DftError;
use crate::pcm::convert_signed16;
use crate::signal::{SampleFormat, Signal};

#[derive(Debug)]
pub enum WavError {
    /// Reading or writing the file failed.
    Hound(hound::Error),
    Dft(DftError),
    /// Float samples or a bit depth other than 8, 16 or 32.
    UnsupportedFormat { bits: u16, float: bool },
    /// An input to [`concatenate`] differs from the first one in rate,
    /// channel count or bit depth.
    MismatchedParameters { path: PathBuf },
}

impl fmt::Display for WavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WavError::Hound(e) => write!(f, "wav: {e}"),
            WavError::Dft(e) => write!(f, "{e}"),
            WavError::UnsupportedFormat { bits, float: true } => {
                write!(f, "unsupported {bits}-bit float samples")
            }
            WavError::UnsupportedFormat { bits, float: false } => {
                write!(f, "unsupported {bits}-bit integer samples")
            }
            WavError::MismatchedParameters { path } => {
                write!(f, "{} does not match the first input's format", path.display())
            }
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WavError::Hound(e) => Some(e),
            WavError::Dft(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hound::Error> for WavError {
    fn from(e: hound::Error) -> Self {
        WavError::Hound(e)
    }
}

impl From<DftError> for WavError {
    fn from(e: DftError) -> Self {
        WavError::Dft(e)
    }
}

fn sample_format(spec: &WavSpec) -> Result<SampleFormat, WavError> {
    let unsupported = WavError::UnsupportedFormat {
        bits: spec.bits_per_sample,
        float: spec.sample_format == HoundFormat::Float,
    };
    if spec.sample_format != HoundFormat::Int {
        return Err(unsupported);
    }
    SampleFormat::from_bits(spec.bits_per_sample).ok_or(unsupported)
}

/// Average interleaved frames into one channel, rounding half to even.
fn downmix(interleaved: &[i32], channels: usize) -> Vec<i32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i64 = frame.iter().map(|&s| s as i64).sum();
            libm::rint(sum as f64 / channels as f64) as i32
        })
        .collect()
}

/// Read an integer PCM WAV file (8, 16 or 32 bit) into a [`Signal`].
///
/// Multi-channel files are averaged down to one channel.
pub fn read_signal<P: AsRef<Path>>(path: P) -> Result<Signal, WavError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let format = sample_format(&spec)?;
    let interleaved: Vec<i32> = reader.samples::<i32>().collect::<Result<_, _>>()?;
    let samples = downmix(&interleaved, spec.channels as usize);
    verbose!(
        "read {} frames ({} channels, {} bit) at {} Hz",
        samples.len(),
        spec.channels,
        spec.bits_per_sample,
        spec.sample_rate
    );
    Ok(Signal::new(samples, spec.sample_rate, format))
}

fn pcm16_spec(rate: u32, channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: HoundFormat::Int,
    }
}

/// Write interleaved 16-bit samples.
pub fn write_pcm16<P: AsRef<Path>>(
    path: P,
    samples: &[i16],
    rate: u32,
    channels: u16,
) -> Result<(), WavError> {
    if rate == 0 {
        return Err(DftError::InvalidParameter("sample rate must be positive").into());
    }
    if channels == 0 {
        return Err(DftError::InvalidParameter("channel count must be positive").into());
    }
    let mut writer = WavWriter::create(path, pcm16_spec(rate, channels))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Clamp `samples` to 16 bits and write them as a mono file.
///
/// Returns how many samples were clamped.
pub fn write_signal<P: AsRef<Path>>(path: P, samples: &[i32], rate: u32) -> Result<usize, WavError> {
    let pcm = convert_signed16(samples);
    write_pcm16(path, &pcm.samples, rate, 1)?;
    Ok(pcm.clamped)
}

/// Append the sample data of every input, in order, into `output`.
///
/// All inputs must share sample rate, channel count, bit depth and sample
/// format; the output uses the same parameters.
pub fn concatenate<P, Q>(inputs: &[P], output: Q) -> Result<(), WavError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (first, rest) = inputs.split_first().ok_or(WavError::Dft(
        DftError::InvalidParameter("at least one input file is required"),
    ))?;
    let mut reader = WavReader::open(first)?;
    let spec = reader.spec();
    let mut data: Vec<i32> = reader.samples::<i32>().collect::<Result<_, _>>()?;
    for path in rest {
        let mut reader = WavReader::open(path)?;
        if reader.spec() != spec {
            return Err(WavError::MismatchedParameters {
                path: path.as_ref().to_path_buf(),
            });
        }
        for s in reader.samples::<i32>() {
            data.push(s?);
        }
    }
    let mut writer = WavWriter::create(output, spec)?;
    for s in data {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    verbose!("concatenated {} files", inputs.len());
    Ok(())
}

/// Human-readable summary of a WAV header, e.g. `"8000 Hz, 1 ch, 16-bit int"`.
pub fn describe<P: AsRef<Path>>(path: P) -> Result<String, WavError> {
    let spec = WavReader::open(path)?.spec();
    let kind = match spec.sample_format {
        HoundFormat::Int => "int",
        HoundFormat::Float => "float",
    };
    Ok(alloc::format!(
        "{} Hz, {} ch, {}-bit {}",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        kind
    ))
}
