//! Scan orchestrator.
//!
//! Drives the per-file pipeline, strictly in order:
//!
//! 1. metadata: prober output through the full pattern catalog
//! 2. head: sniffer finding, container overflow detectors, embedded payloads,
//!    printable-string patterns
//! 3. tail: payloads and string patterns over the end of large files
//! 4. steganography: LSB analysis of one decoded frame, when a frame
//!    extractor is configured
//!
//! Steps are independent. A failing step is recorded in the report and the
//! pipeline moves on; only cancellation stops it early.

pub mod window;

pub use window::{ScanContext, WindowOrigin};

use crate::cancel::CancelToken;
use crate::catalog::PatternCatalog;
use crate::collaborators::{FrameExtractor, FrameRequest, MetadataProber};
use crate::config::{ScanConfig, TextConfig};
use crate::containers;
use crate::error::{Result, ScanError};
use crate::payloads;
use crate::sniff::{self, MIN_SNIFF_LEN};
use crate::stego::{self, LsbVerdict};
use crate::strings;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

const MASQUERADE_MESSAGE: &str =
    "File masquerading as video: starts with executable (PE/ELF/Mach-O)";
const SWF_CONTAINER_MESSAGE: &str =
    "File is SWF/Flash, not a video container (potential exploit vector)";
const UNRECOGNIZED_MESSAGE: &str =
    "Unrecognized file format: does not match MP4/MKV/AVI/FLV/ASF/MPEG/OGG signatures";

/// Where a finding's evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatKind {
    Metadata,
    Content,
}

impl ThreatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreatKind::Metadata => "metadata",
            ThreatKind::Content => "content",
        }
    }
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding. Order in a report is detection order, not severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Threat {
    pub kind: ThreatKind,
    pub message: String,
}

impl Threat {
    pub fn new(kind: ThreatKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn content(message: impl Into<String>) -> Self {
        Self::new(ThreatKind::Content, message)
    }
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Render findings as newline-separated `[kind] message` lines.
///
/// An empty list renders as an empty string.
pub fn format_threats(threats: &[Threat]) -> String {
    threats
        .iter()
        .map(Threat::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStep {
    Metadata,
    Head,
    Tail,
    Steganography,
}

/// A step that produced no findings because it failed.
#[derive(Debug)]
pub struct StepFailure {
    pub step: ScanStep,
    pub error: ScanError,
}

/// Everything a scan produced: ordered findings plus per-step failures.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub threats: Vec<Threat>,
    pub failures: Vec<StepFailure>,
}

impl ScanReport {
    /// True when the scan was stopped by cancellation or its deadline.
    pub fn is_cancelled(&self) -> bool {
        self.failures
            .last()
            .is_some_and(|f| f.error.is_cancellation())
    }

    pub fn is_clean(&self) -> bool {
        self.threats.is_empty()
    }

    pub fn formatted(&self) -> String {
        format_threats(&self.threats)
    }

    /// Fold one step's outcome in. Breaks when the scan must stop.
    fn record(&mut self, step: ScanStep, outcome: Result<Vec<Threat>>) -> ControlFlow<()> {
        match outcome {
            Ok(threats) => {
                debug!(?step, found = threats.len(), "step finished");
                self.threats.extend(threats);
                ControlFlow::Continue(())
            }
            Err(error) if error.is_cancellation() => {
                info!(?step, %error, "scan stopped");
                self.failures.push(StepFailure { step, error });
                ControlFlow::Break(())
            }
            Err(error) => {
                warn!(?step, %error, "scan step failed");
                self.failures.push(StepFailure { step, error });
                ControlFlow::Continue(())
            }
        }
    }
}

/// Threat scanner for media files.
///
/// Holds only immutable state, so one scanner can serve concurrent scans.
pub struct Scanner {
    config: ScanConfig,
    catalog: Arc<PatternCatalog>,
    prober: Box<dyn MetadataProber>,
    frames: Option<Box<dyn FrameExtractor>>,
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("patterns", &self.catalog.patterns().len())
            .field("frame_extractor", &self.frames.is_some())
            .finish()
    }
}

impl Scanner {
    /// Build a scanner, compiling the pattern catalog from `config.text`.
    pub fn new(config: ScanConfig, prober: Box<dyn MetadataProber>) -> Result<Self> {
        config.validate()?;
        let catalog = if config.text == TextConfig::default() {
            PatternCatalog::shared()
        } else {
            Arc::new(PatternCatalog::new(&config.text)?)
        };
        Ok(Self {
            config,
            catalog,
            prober,
            frames: None,
        })
    }

    /// Build a scanner around an already compiled catalog.
    pub fn with_catalog(
        config: ScanConfig,
        catalog: Arc<PatternCatalog>,
        prober: Box<dyn MetadataProber>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            prober,
            frames: None,
        })
    }

    /// Enable the steganography step.
    pub fn with_frame_extractor(mut self, extractor: Box<dyn FrameExtractor>) -> Self {
        self.frames = Some(extractor);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan one file.
    ///
    /// Never fails as a whole: step errors land in [`ScanReport::failures`]
    /// next to whatever was found. A cancelled scan keeps the findings of
    /// the steps that completed.
    pub fn scan(&self, path: &Path, cancel: &CancelToken) -> ScanReport {
        let span = info_span!("scan", path = %path.display());
        let _guard = span.enter();
        info!("scan started");

        let mut report = ScanReport::default();
        let _ = self.run_pipeline(path, cancel, &mut report);

        info!(
            threats = report.threats.len(),
            failures = report.failures.len(),
            cancelled = report.is_cancelled(),
            "scan finished"
        );
        report
    }

    fn run_pipeline(
        &self,
        path: &Path,
        cancel: &CancelToken,
        report: &mut ScanReport,
    ) -> ControlFlow<()> {
        report.record(ScanStep::Metadata, self.scan_metadata(path, cancel))?;

        match self.open_media(path) {
            Ok(Some((mut file, file_size))) => {
                self.scan_content(&mut file, file_size, cancel, report)?;
            }
            Ok(None) => debug!("not a regular file, skipping content"),
            Err(error) => {
                report.record(ScanStep::Head, Err(error))?;
            }
        }

        if let Some(extractor) = &self.frames {
            if self.config.stego.enabled {
                report.record(
                    ScanStep::Steganography,
                    self.scan_steganography(extractor.as_ref(), path, cancel),
                )?;
            }
        }
        ControlFlow::Continue(())
    }

    fn scan_metadata(&self, path: &Path, cancel: &CancelToken) -> Result<Vec<Threat>> {
        let _step = crate::step_span!("metadata").entered();
        cancel.check()?;
        let text = self.prober.read_metadata(path, cancel)?;
        Ok(self.catalog.scan_text(&text, ThreatKind::Metadata))
    }

    /// Open `path` for content scanning. Directories yield `None`.
    fn open_media(&self, path: &Path) -> Result<Option<(File, u64)>> {
        let file = File::open(path)?;
        let meta = file.metadata()?;
        if meta.is_dir() {
            return Ok(None);
        }
        Ok(Some((file, meta.len())))
    }

    fn scan_content(
        &self,
        file: &mut File,
        file_size: u64,
        cancel: &CancelToken,
        report: &mut ScanReport,
    ) -> ControlFlow<()> {
        let io = &self.config.io;
        let step = crate::step_span!("head", file_size).entered();
        let head = window::read_head(file, file_size, io.head_cap, io.chunk_size, cancel)
            .map(|ctx| self.scan_window(&ctx));
        report.record(ScanStep::Head, head)?;
        drop(step);

        let both = io.head_cap as u64 + io.tail_cap as u64;
        if file_size > both {
            let _step = crate::step_span!("tail", file_size).entered();
            let tail = window::read_tail(file, file_size, io.tail_cap, io.chunk_size, cancel)
                .map(|ctx| self.scan_window(&ctx));
            report.record(ScanStep::Tail, tail)?;
        } else {
            debug!(file_size, "file fits in head and tail caps, tail skipped");
        }
        ControlFlow::Continue(())
    }

    /// Run the in-memory detectors over one window.
    ///
    /// Head windows get the sniffer finding and the container overflow
    /// detectors; both origins get payload and text detection.
    pub fn scan_window(&self, ctx: &ScanContext) -> Vec<Threat> {
        let data = ctx.bytes.as_slice();
        let mut threats = Vec::new();

        if ctx.origin == WindowOrigin::Head {
            if let Some(message) = self.classify_start(data) {
                threats.push(Threat::content(message));
            }
            threats.extend(
                containers::detect_overflows(data, ctx.file_size, &self.config.overflow)
                    .into_iter()
                    .map(|d| Threat::content(d.message)),
            );
        }

        threats.extend(
            payloads::detect_payloads(data, ctx.origin, &self.config.payload)
                .into_iter()
                .map(|p| Threat::content(p.message(ctx.origin))),
        );

        let text = strings::extract_text(data, self.config.text.min_string_len);
        if !text.is_empty() {
            threats.extend(self.catalog.scan_text(&text, ThreatKind::Content));
        }
        threats
    }

    /// Scan an in-memory head window as if it were the start of a file.
    pub fn scan_content_bytes(&self, data: &[u8], file_size: u64) -> Vec<Threat> {
        let cap = data.len().min(self.config.io.head_cap);
        let ctx = ScanContext::new(data[..cap].to_vec(), file_size, WindowOrigin::Head);
        self.scan_window(&ctx)
    }

    /// Finding about what the file starts with, if it is not a video.
    fn classify_start(&self, data: &[u8]) -> Option<&'static str> {
        let prefix = &data[..data.len().min(self.config.io.sniff_len)];
        if sniff::starts_with_executable(prefix) {
            return Some(MASQUERADE_MESSAGE);
        }
        if prefix.len() < MIN_SNIFF_LEN {
            return None;
        }
        let format = sniff::sniff(prefix);
        debug!(%format, "head classified");
        if format.is_recognized() {
            None
        } else if sniff::starts_with_swf(prefix) {
            Some(SWF_CONTAINER_MESSAGE)
        } else {
            Some(UNRECOGNIZED_MESSAGE)
        }
    }

    fn scan_steganography(
        &self,
        extractor: &dyn FrameExtractor,
        path: &Path,
        cancel: &CancelToken,
    ) -> Result<Vec<Threat>> {
        let _step = crate::step_span!("steganography").entered();
        cancel.check()?;
        let stego = &self.config.stego;
        let request = FrameRequest {
            seek_seconds: stego.seek_seconds,
            width: stego.width,
            height: stego.height,
        };
        let frame = extractor.extract_frame(path, &request, cancel)?;
        debug!(
            got = frame.len(),
            expected = request.expected_bytes(),
            "frame decoded"
        );
        let verdict = stego::analyze_lsb(&frame, stego);
        debug!(?verdict, "steganography verdict");
        Ok(match verdict {
            LsbVerdict::Uniform => vec![Threat::content(stego::STEGO_MESSAGE)],
            _ => Vec::new(),
        })
    }
}
