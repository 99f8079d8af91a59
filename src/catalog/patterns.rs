//! Built-in textual threat signatures.
//!
//! Patterns stay conservative: bounded repetitions only, no constructs that
//! invite catastrophic backtracking (the `regex` crate rules those out
//! anyway), and each one names a concrete injection dialect.

/// How a compiled pattern turns matches into a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Any match produces the fixed message.
    Presence,
    /// Capture group 1 holds an extension; the message lists each distinct one.
    ExtensionList,
    /// Only matches longer than the configured base64 threshold count.
    LongRun,
}

/// Source form of one catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub name: &'static str,
    pub pattern: &'static str,
    pub message: &'static str,
    /// Too noisy for text pulled out of binary windows.
    pub metadata_only: bool,
    pub rule: MatchRule,
}

const fn spec(name: &'static str, pattern: &'static str, message: &'static str) -> PatternSpec {
    PatternSpec {
        name,
        pattern,
        message,
        metadata_only: false,
        rule: MatchRule::Presence,
    }
}

pub const BUILTIN_PATTERNS: &[PatternSpec] = &[
    PatternSpec {
        name: "executable_extension",
        pattern: r"(?i)\.(exe|bat|cmd|ps1|vbs|vbe|js|jse|wsf|wsh|scr|com|msi|dll|jar|deb|rpm|app|swf)\b",
        message: "Suspicious executable extension",
        metadata_only: false,
        rule: MatchRule::ExtensionList,
    },
    spec(
        "script_injection",
        r"(?i)(<script|javascript:|vbscript:|data:text/html|onload\s*=|onerror\s*=|onclick\s*=)",
        "Script or injection pattern",
    ),
    spec(
        "code_execution",
        r"(?i)(\beval\s*\(|document\.write\s*\(|innerHTML\s*=|outerHTML\s*=|exec\s*\(|Function\s*\()",
        "Code execution pattern (eval/exec)",
    ),
    spec(
        "shell_command",
        r#"(?i)(/bin/(ba)?sh|cmd\.exe|powershell|wscript\.shell|exec\s*\(\s*["']|system\s*\(\s*["']|Runtime\.getRuntime\(\)\.exec)"#,
        "Shell/command execution pattern",
    ),
    spec(
        "xxe",
        r#"(?i)(<!ENTITY|SYSTEM\s+["']file://|<!DOCTYPE[^>]*\[\s*<!ENTITY)"#,
        "XXE or external entity inclusion",
    ),
    spec(
        "suspicious_url_scheme",
        r"(?i)(file://|data:application/(x-)?(octet-stream|executable)|php://|expect://|dict://|gopher://)",
        "Suspicious URL scheme",
    ),
    spec(
        "miner_c2",
        r"(?i)(stratum\+tcp://|xmrpool\.|miningpool\.|\.onion\b|stratum\.)",
        "Crypto miner or C2 infrastructure pattern",
    ),
    spec(
        "php_web_shell",
        r"(?i)(\beval\s*\(\s*\$|base64_decode\s*\(|passthru\s*\(|shell_exec\s*\(|preg_replace\s*\([^)]*/e\s*\)|assert\s*\(\s*\$|create_function\s*\(|popen\s*\(|proc_open\s*\()",
        "PHP/web shell pattern (eval, base64_decode, shell_exec, etc.)",
    ),
    spec(
        "ssrf",
        r"(?i)(169\.254\.169\.254|metadata\.google\.internal|file://localhost|https?://127\.0\.0\.1|http://localhost)",
        "SSRF pattern (cloud metadata, localhost URL)",
    ),
    spec(
        "html_polyglot",
        r"(?i)(<!DOCTYPE\s+html|<html(\s|>))",
        "Polyglot HTML/XML in non-document context",
    ),
    spec(
        "hls_uri_injection",
        r#"(?i)(#EXT-X-KEY|#EXT-X-MAP|#EXT-X-SESSION-DATA).*URI\s*=\s*["']?(file://|javascript:|data:)"#,
        "M3U8/HLS playlist URI injection (file://, javascript:, data:)",
    ),
    spec(
        "env_hijack",
        r"(?i)(LD_PRELOAD|LD_LIBRARY_PATH|DYLD_INSERT_LIBRARIES)\s*=",
        "Environment hijacking pattern (LD_PRELOAD, DYLD_INSERT_LIBRARIES)",
    ),
    spec(
        "sensitive_path",
        r"(?i)/(etc/passwd|etc/shadow|etc/sudoers|proc/self/)",
        "Sensitive file path access attempt (/etc/passwd, /proc/self/)",
    ),
    spec(
        "ass_long_override",
        r"\{\\[^}]{200,}\}",
        "ASS/SSA subtitle: suspiciously long override block (potential parser overflow)",
    ),
    spec(
        "webvtt_script",
        r"(?i)WEBVTT\b.{0,500}(<script|<iframe|javascript:|on\w+\s*=)",
        "WebVTT subtitle: embedded HTML/script (XSS vector)",
    ),
    spec(
        "srt_script",
        r"(?i)\d{2}:\d{2}:\d{2}[,.]\d{3}.{0,200}(<script|<iframe|javascript:|on\w+\s*=)",
        "SRT subtitle: embedded HTML/script (XSS vector)",
    ),
    spec(
        "dash_uri_injection",
        r"(?i)(<BaseURL|<SourceURL|<Initialization)\s*>?\s*(file://|javascript:|data:)",
        "DASH MPD: suspicious URI in BaseURL/SourceURL (file://, javascript:, data:)",
    ),
    spec(
        "ttml_xxe",
        r#"(?i)(<tt\s|<dfxp\s|xmlns:tt=).{0,500}(<!ENTITY|SYSTEM\s+["']file://|<!DOCTYPE[^>]*\[\s*<!ENTITY)"#,
        "TTML/DFXP subtitle: XXE pattern (external entity, file://)",
    ),
    spec(
        "sami_script",
        r"(?i)<SAMI.{0,200}(<script|javascript:|on\w+\s*=)",
        "SAMI subtitle: embedded HTML/script (XSS vector)",
    ),
    spec(
        "vobsub_traversal",
        r"(?i)\.sub.{0,500}\.\./",
        "VobSub: path traversal pattern (../) in path",
    ),
    PatternSpec {
        name: "base64_payload",
        pattern: r"[A-Za-z0-9+/]{200,}={0,2}",
        message: "Large base64-like payload",
        metadata_only: true,
        rule: MatchRule::LongRun,
    },
];
