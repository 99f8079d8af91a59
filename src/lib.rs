//! mediascan: layered threat scanning for media files.
//!
//! The engine inspects a file's metadata and raw bytes for embedded exploits,
//! malware and injection payloads without trusting any single parser for the
//! container format. It combines defensive format sniffing, heuristic
//! structural overflow checks, signature and text-pattern matching, and LSB
//! statistics over one decoded frame, all under fixed byte budgets.
//!
//! ```no_run
//! use mediascan::{format_threats, CancelToken, NoMetadata, ScanConfig, Scanner};
//! use std::path::Path;
//!
//! let scanner = Scanner::new(ScanConfig::default(), Box::new(NoMetadata))?;
//! let report = scanner.scan(Path::new("clip.mp4"), &CancelToken::new());
//! println!("{}", format_threats(&report.threats));
//! # Ok::<(), mediascan::ScanError>(())
//! ```

pub mod cancel;
pub mod catalog;
pub mod collaborators;
pub mod config;
pub mod containers;
pub mod error;
pub mod logging;
pub mod payloads;
pub mod scanner;
pub mod sniff;
pub mod stego;
pub mod strings;

pub use cancel::CancelToken;
pub use catalog::PatternCatalog;
#[cfg(feature = "ffmpeg")]
pub use collaborators::ffmpeg::{FfmpegFrameExtractor, FfprobeProber};
pub use collaborators::{FrameExtractor, FrameRequest, MetadataProber, NoMetadata};
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use scanner::{
    format_threats, ScanContext, ScanReport, ScanStep, Scanner, StepFailure, Threat, ThreatKind,
    WindowOrigin,
};
pub use sniff::{sniff, ContainerFormat};
