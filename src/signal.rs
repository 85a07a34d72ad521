//! Single-channel integer PCM signal handed to the transforms.

use alloc::vec::Vec;

use crate::spectrum::time_axis;

/// Integer width of the source samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    I8,
    I16,
    I32,
}

impl SampleFormat {
    pub fn bits(self) -> u16 {
        match self {
            SampleFormat::I8 => 8,
            SampleFormat::I16 => 16,
            SampleFormat::I32 => 32,
        }
    }

    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(SampleFormat::I8),
            16 => Some(SampleFormat::I16),
            32 => Some(SampleFormat::I32),
            _ => None,
        }
    }
}

/// Samples widened to `i32`, with their sample rate and source width.
///
/// The transforms treat `samples` as one channel; readers downmix or reject
/// multi-channel input before building a `Signal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub samples: Vec<i32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
}

impl Signal {
    pub fn new(samples: Vec<i32>, sample_rate: u32, format: SampleFormat) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
            format,
        }
    }

    pub fn from_i16(samples: &[i16], sample_rate: u32) -> Self {
        Self::new(
            samples.iter().map(|&s| s as i32).collect(),
            sample_rate,
            SampleFormat::I16,
        )
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Sample instants for plotting the waveform.
    pub fn time_axis(&self) -> Vec<f64> {
        time_axis(self.samples.len(), self.sample_rate)
    }
}
