//! Pattern Catalog: compiled textual signatures plus binary magic tables.
//!
//! The catalog is immutable once built and is shared by reference between
//! scanners, so concurrent scans need no synchronisation. `shared()` hands
//! out a lazily compiled copy of the built-in catalog with default
//! thresholds.

pub mod magic;
pub mod patterns;

use crate::config::TextConfig;
use crate::error::{Result, ScanError};
use crate::scanner::{Threat, ThreatKind};
use once_cell::sync::Lazy;
use patterns::{MatchRule, PatternSpec, BUILTIN_PATTERNS};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use tracing::debug;

/// Compiled-size ceiling for one pattern. The bounded `.{0,500}` windows in
/// the subtitle patterns expand to large automata.
const REGEX_SIZE_LIMIT: usize = 64 * 1024 * 1024;

static SHARED: Lazy<Arc<PatternCatalog>> = Lazy::new(|| {
    Arc::new(
        PatternCatalog::new(&TextConfig::default()).expect("built-in patterns are valid regexes"),
    )
});

/// One compiled text signature.
#[derive(Debug, Clone)]
pub struct TextPattern {
    pub name: &'static str,
    pub message: &'static str,
    pub metadata_only: bool,
    rule: MatchRule,
    regex: Regex,
}

impl TextPattern {
    fn compile(spec: &PatternSpec) -> Result<Self> {
        let regex = RegexBuilder::new(spec.pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| ScanError::Config(format!("pattern {}: {}", spec.name, e)))?;
        Ok(Self {
            name: spec.name,
            message: spec.message,
            metadata_only: spec.metadata_only,
            rule: spec.rule,
            regex,
        })
    }

    /// Evaluate against `text`, returning the finding message on a hit.
    fn evaluate(&self, text: &str, long_run_min: usize) -> Option<String> {
        match self.rule {
            MatchRule::Presence => self
                .regex
                .is_match(text)
                .then(|| self.message.to_string()),
            MatchRule::ExtensionList => {
                let mut extensions: Vec<String> = Vec::new();
                for caps in self.regex.captures_iter(text) {
                    if let Some(ext) = caps.get(1) {
                        let ext = format!(".{}", ext.as_str().to_ascii_lowercase());
                        if !extensions.contains(&ext) {
                            extensions.push(ext);
                        }
                    }
                }
                (!extensions.is_empty())
                    .then(|| format!("{}: {}", self.message, extensions.join(", ")))
            }
            MatchRule::LongRun => self
                .regex
                .find_iter(text)
                .any(|m| m.as_str().len() > long_run_min)
                .then(|| self.message.to_string()),
        }
    }
}

/// The full set of compiled text signatures.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<TextPattern>,
    base64_min_len: usize,
}

impl PatternCatalog {
    /// Compile the built-in signatures with thresholds from `text`.
    pub fn new(text: &TextConfig) -> Result<Self> {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .map(TextPattern::compile)
            .collect::<Result<Vec<_>>>()?;
        debug!("compiled {} text patterns", patterns.len());
        Ok(Self {
            patterns,
            base64_min_len: text.base64_min_len,
        })
    }

    /// Process-wide catalog with default thresholds.
    pub fn shared() -> Arc<PatternCatalog> {
        Arc::clone(&SHARED)
    }

    pub fn patterns(&self) -> &[TextPattern] {
        &self.patterns
    }

    /// Run every applicable pattern over `text`, in catalog order.
    ///
    /// `metadata_only` patterns run only when `kind` is [`ThreatKind::Metadata`].
    pub fn scan_text(&self, text: &str, kind: ThreatKind) -> Vec<Threat> {
        let include_metadata_only = kind == ThreatKind::Metadata;
        self.patterns
            .iter()
            .filter(|p| include_metadata_only || !p.metadata_only)
            .filter_map(|p| {
                let message = p.evaluate(text, self.base64_min_len)?;
                debug!(pattern = p.name, ?kind, "text pattern matched");
                Some(Threat::new(kind, message))
            })
            .collect()
    }
}
