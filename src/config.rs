//! Configuration for the scan pipeline.
//!
//! Every numeric threshold the detectors use lives here. The defaults are
//! empirically chosen heuristics, not protocol constants, so deployments can
//! tune them from a JSON file without rebuilding.

use crate::catalog::magic::TS_PACKET_LEN;
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

/// Shortest sniff prefix that still reaches the third transport stream sync byte.
pub const MIN_SNIFF_PREFIX: usize = 2 * TS_PACKET_LEN + 1;

/// Master configuration for a scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Byte windows and read chunking.
    pub io: IoConfig,
    /// Printable-string extraction and text pattern thresholds.
    pub text: TextConfig,
    /// Container overflow thresholds.
    pub overflow: OverflowLimits,
    /// Embedded payload sanity bounds.
    pub payload: PayloadLimits,
    /// Frame extraction and LSB analysis.
    pub stego: StegoConfig,
}

impl ScanConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ScanError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScanError::Config(format!("reading {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Reject settings that would make a detector meaningless or unbounded.
    pub fn validate(&self) -> Result<()> {
        let io = &self.io;
        if io.head_cap == 0 || io.tail_cap == 0 {
            return Err(ScanError::Config("window caps must be non-zero".into()));
        }
        if io.chunk_size == 0 {
            return Err(ScanError::Config("chunk_size must be non-zero".into()));
        }
        if io.sniff_len < MIN_SNIFF_PREFIX {
            return Err(ScanError::Config(format!(
                "sniff_len must be at least {MIN_SNIFF_PREFIX}"
            )));
        }
        if self.text.min_string_len == 0 {
            return Err(ScanError::Config("min_string_len must be non-zero".into()));
        }
        let p = &self.payload;
        if p.swf_min_version > p.swf_max_version || p.swf_min_length > p.swf_max_length {
            return Err(ScanError::Config("SWF bounds are inverted".into()));
        }
        if p.opentype_min_tables > p.opentype_max_tables {
            return Err(ScanError::Config("OpenType table bounds are inverted".into()));
        }
        if p.pe_max_lfanew == 0 {
            return Err(ScanError::Config("pe_max_lfanew must be non-zero".into()));
        }
        let s = &self.stego;
        if s.width == 0 || s.height == 0 {
            return Err(ScanError::Config("frame dimensions must be non-zero".into()));
        }
        if !(s.uniform_band > 0.0 && s.uniform_band < 0.5) {
            return Err(ScanError::Config(
                "uniform_band must lie strictly between 0 and 0.5".into(),
            ));
        }
        if s.seek_seconds < 0.0 {
            return Err(ScanError::Config("seek_seconds must not be negative".into()));
        }
        Ok(())
    }
}

/// Byte windows and read chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Bytes read from the start of the file (default: 1 MiB).
    pub head_cap: usize,
    /// Bytes read from the end of the file (default: 512 KiB).
    pub tail_cap: usize,
    /// Read granularity; cancellation is checked between chunks (default: 64 KiB).
    pub chunk_size: usize,
    /// Prefix length handed to the format sniffer; covers three transport
    /// stream packets (default: 512).
    pub sniff_len: usize,
    /// Cap on bytes accepted from an external tool's stdout (default: 64 MiB).
    pub max_collaborator_output: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            head_cap: MIB,
            tail_cap: 512 * KIB,
            chunk_size: 64 * KIB,
            sniff_len: 512,
            max_collaborator_output: 64 * MIB,
        }
    }
}

/// Text extraction and pattern thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Minimum printable-ASCII run kept from binary windows (default: 15).
    pub min_string_len: usize,
    /// A base64-like run must be longer than this to be reported (default: 300).
    pub base64_min_len: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            min_string_len: 15,
            base64_min_len: 300,
        }
    }
}

/// Size limits for the container overflow detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverflowLimits {
    /// Largest plausible MP4 sample-table atom (default: 16 MiB).
    pub mp4_max_atom: u64,
    /// Largest plausible FLV tag payload (default: 200 MiB).
    pub flv_max_tag: u64,
    /// Largest plausible EBML element (default: 200 MiB).
    pub mkv_max_element: u64,
    /// Largest plausible ASF object (default: 500 MiB).
    pub asf_max_object: u64,
    /// RealMedia walk stops after this many bytes (default: 256 KiB).
    pub rm_walk_cap: usize,
    /// Ogg page size protocol maximum (default: 65,307).
    pub ogg_max_page: usize,
    /// MPEG-TS PSI section length protocol maximum (default: 1021).
    pub ts_max_section: usize,
}

impl Default for OverflowLimits {
    fn default() -> Self {
        Self {
            mp4_max_atom: 16 * MIB as u64,
            flv_max_tag: 200 * MIB as u64,
            mkv_max_element: 200 * MIB as u64,
            asf_max_object: 500 * MIB as u64,
            rm_walk_cap: 256 * KIB,
            ogg_max_page: 65_307,
            ts_max_section: 1021,
        }
    }
}

/// Structural sanity bounds for embedded payload signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadLimits {
    /// Largest accepted DOS `e_lfanew` pointer (default: 0xFFF).
    pub pe_max_lfanew: u32,
    pub swf_min_version: u8,
    pub swf_max_version: u8,
    pub swf_min_length: u32,
    pub swf_max_length: u32,
    /// Bytes after a pickle GLOBAL opcode searched for the module newline (default: 80).
    pub pickle_newline_window: usize,
    pub opentype_min_tables: u16,
    pub opentype_max_tables: u16,
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            pe_max_lfanew: 0xFFF,
            swf_min_version: 1,
            swf_max_version: 21,
            swf_min_length: 8,
            swf_max_length: 100 * MIB as u32,
            pickle_newline_window: 80,
            opentype_min_tables: 1,
            opentype_max_tables: 50,
        }
    }
}

/// Frame extraction request and LSB uniformity thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Run the steganography step when a frame extractor is configured.
    pub enabled: bool,
    /// Seek position of the analysed frame (default: 1.0 s).
    pub seek_seconds: f64,
    pub width: u32,
    pub height: u32,
    /// Minimum samples per channel before a verdict is made (default: 10,000).
    pub min_pixels: usize,
    /// Half-width of the band around 0.5 that counts as uniform (default: 0.002).
    pub uniform_band: f64,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seek_seconds: 1.0,
            width: 640,
            height: 360,
            min_pixels: 10_000,
            uniform_band: 0.002,
        }
    }
}

impl StegoConfig {
    /// Number of interleaved RGB bytes a full frame occupies.
    pub fn expected_frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}
