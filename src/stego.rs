//! Least-significant-bit statistics over one decoded frame.
//!
//! Natural images have channel-dependent, uneven LSB distributions. A split
//! that sits almost exactly at 50/50 in all three channels at once is the
//! anomaly being flagged.

use crate::config::StegoConfig;
use serde::Serialize;
use tracing::debug;

pub const STEGO_MESSAGE: &str =
    "Possible LSB steganography: unusually uniform LSB distribution in video frames";

const CHANNELS: usize = 3;

/// Per-channel LSB counts for an interleaved RGB buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LsbCounts {
    /// `[channel][bit]`
    pub counts: [[usize; 2]; CHANNELS],
}

impl LsbCounts {
    pub fn from_rgb(pixels: &[u8]) -> Self {
        let mut counts = [[0usize; 2]; CHANNELS];
        for (i, &b) in pixels.iter().enumerate() {
            counts[i % CHANNELS][(b & 1) as usize] += 1;
        }
        Self { counts }
    }

    pub fn samples(&self, channel: usize) -> usize {
        self.counts[channel][0] + self.counts[channel][1]
    }

    /// Fraction of samples in `channel` whose LSB is 0.
    pub fn zero_ratio(&self, channel: usize) -> f64 {
        let n = self.samples(channel);
        if n == 0 {
            return 0.0;
        }
        self.counts[channel][0] as f64 / n as f64
    }
}

/// Outcome of analysing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum LsbVerdict {
    /// Too few bytes returned by the decoder.
    Truncated { got: usize, expected: usize },
    /// A channel had fewer samples than the configured minimum.
    TooFewSamples,
    Natural,
    Uniform,
}

impl LsbVerdict {
    pub fn is_suspicious(self) -> bool {
        self == LsbVerdict::Uniform
    }
}

/// Analyse a raw RGB frame.
///
/// Frames shorter than half the expected size are decode failures. Longer
/// frames are cut to the expected size.
pub fn analyze_lsb(pixels: &[u8], config: &StegoConfig) -> LsbVerdict {
    let expected = config.expected_frame_bytes();
    if pixels.len() < expected / 2 {
        debug!("frame has {} bytes, expected {}", pixels.len(), expected);
        return LsbVerdict::Truncated {
            got: pixels.len(),
            expected,
        };
    }
    let frame = &pixels[..pixels.len().min(expected)];
    let counts = LsbCounts::from_rgb(frame);

    if (0..CHANNELS).any(|ch| counts.samples(ch) < config.min_pixels) {
        return LsbVerdict::TooFewSamples;
    }

    let band = (0.5 - config.uniform_band)..=(0.5 + config.uniform_band);
    let ratios: Vec<f64> = (0..CHANNELS).map(|ch| counts.zero_ratio(ch)).collect();
    debug!(?ratios, "LSB zero ratios");
    if ratios.iter().all(|r| band.contains(r)) {
        LsbVerdict::Uniform
    } else {
        LsbVerdict::Natural
    }
}
