use super::{scanner_with, small_window_config};
use crate::common::fixtures;
use crate::common::test_utils::create_temp_file_with_layout;
use crate::common::{CancellingProber, StubFrames, StubProber};
use mediascan::{CancelToken, ScanConfig, ScanError, ScanStep, Scanner, ThreatKind};
use std::time::Duration;

#[test]
fn cancellation_keeps_findings_so_far() {
    let token = CancelToken::new();
    let prober = CancellingProber {
        text: "LD_PRELOAD=/tmp/evil.so".into(),
        token: token.clone(),
    };
    let file = create_temp_file_with_layout(&fixtures::minimal_pe(), 10_000, 0, b"");
    let scanner = scanner_with(small_window_config(), prober);
    let report = scanner.scan(file.path(), &token);

    // Metadata completed before the token tripped; the head read did not.
    assert_eq!(report.threats.len(), 1);
    assert_eq!(report.threats[0].kind, ThreatKind::Metadata);
    assert!(report.is_cancelled());
    let last = report.failures.last().unwrap();
    assert_eq!(last.step, ScanStep::Head);
    assert!(matches!(last.error, ScanError::Cancelled));
}

#[test]
fn cancelled_before_start_runs_nothing() {
    let token = CancelToken::new();
    token.cancel();
    let prober = StubProber::text("<script>");
    let calls = prober.calls();
    let file = create_temp_file_with_layout(&fixtures::minimal_pe(), 1024, 0, b"");
    let scanner = scanner_with(ScanConfig::default(), prober);
    let report = scanner.scan(file.path(), &token);

    assert!(report.threats.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].step, ScanStep::Metadata);
    assert!(report.is_cancelled());
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn elapsed_deadline_is_distinct_from_io_failure() {
    let token = CancelToken::with_timeout(Duration::from_millis(1));
    std::thread::sleep(Duration::from_millis(20));
    let file = create_temp_file_with_layout(&fixtures::minimal_mp4(), 1024, 0, b"");
    let scanner = scanner_with(ScanConfig::default(), StubProber::text(""));
    let report = scanner.scan(file.path(), &token);

    assert!(report.is_cancelled());
    let err = &report.failures.last().unwrap().error;
    assert!(matches!(err, ScanError::Timeout { .. }));
    assert!(!matches!(err, ScanError::Io(_)));
}

#[test]
fn cancellation_skips_steganography() {
    let token = CancelToken::new();
    let prober = CancellingProber {
        text: String::new(),
        token: token.clone(),
    };
    let frames = StubFrames::frame(fixtures::uniform_lsb_frame(640, 360));
    let seen = frames.seen.clone();
    let file = create_temp_file_with_layout(&fixtures::minimal_mp4(), 2048, 0, b"");
    let scanner = Scanner::new(ScanConfig::default(), Box::new(prober))
        .unwrap()
        .with_frame_extractor(Box::new(frames));
    let report = scanner.scan(file.path(), &token);

    assert!(report.is_cancelled());
    assert!(report.threats.is_empty());
    assert!(seen.lock().unwrap().is_none());
}
