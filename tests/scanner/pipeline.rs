use super::{messages, scanner_with, small_window_config};
use crate::common::fixtures;
use crate::common::test_utils::{create_temp_file, create_temp_file_with_layout};
use crate::common::StubProber;
use mediascan::{
    format_threats, CancelToken, NoMetadata, PatternCatalog, ScanConfig, ScanStep, Scanner,
    ThreatKind,
};
use std::sync::Arc;

const BENIGN_TAGS: &str =
    r#"{"format": {"tags": {"title": "Holiday 2019", "encoder": "Lavf58.29.100"}}}"#;

#[test]
fn clean_file_formats_to_empty_string() {
    let file = create_temp_file(&fixtures::padded_mp4(8192));
    let scanner = scanner_with(ScanConfig::default(), StubProber::text(BENIGN_TAGS));
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(report.is_clean());
    assert_eq!(format_threats(&report.threats), "");
    assert_eq!(report.formatted(), "");
}

#[test]
fn executable_posing_as_video() {
    let mut content = fixtures::minimal_pe();
    content.resize(4096, 0);
    let file = create_temp_file(&content);
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());

    let msgs = messages(&report.threats);
    assert_eq!(
        msgs[0],
        "File masquerading as video: starts with executable (PE/ELF/Mach-O)"
    );
    assert!(msgs.iter().any(|m| m.contains("Windows executable detected")));
    assert!(report.threats.iter().all(|t| t.kind == ThreatKind::Content));
}

#[test]
fn pe_inside_video_is_embedded_finding() {
    let mut content = fixtures::padded_mp4(2048);
    content.extend(fixtures::minimal_pe());
    content.resize(6000, 0);
    let file = create_temp_file(&content);
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert_eq!(
        messages(&report.threats),
        vec!["Embedded Windows executable detected (PE)"]
    );
}

#[test]
fn tail_is_skipped_for_small_files() {
    // 5000 bytes: the ELF lies outside the 4096-byte head, and the file is
    // smaller than head + tail, so no tail window is read.
    let file = create_temp_file_with_layout(&fixtures::minimal_mp4(), 5000, 0, b"\x7fELF\x02\x01\x01\0");
    let scanner = scanner_with(small_window_config(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert!(report.is_clean(), "{:?}", report.threats);
    assert!(report.failures.is_empty());
}

#[test]
fn tail_catches_appended_executable() {
    let file = create_temp_file_with_layout(&fixtures::minimal_mp4(), 10_000, 0, b"\x7fELF\x02\x01\x01\0");
    let scanner = scanner_with(small_window_config(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert_eq!(
        format_threats(&report.threats),
        "[content] Appended ELF executable at end of file"
    );
}

#[test]
fn tail_text_patterns() {
    let file = create_temp_file_with_layout(
        &fixtures::minimal_mp4(),
        10_000,
        0,
        b"\0#EXTM3U\n#EXT-X-KEY:METHOD=AES-128,URI=\"file:///etc/passwd\"\n",
    );
    let scanner = scanner_with(small_window_config(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());
    let msgs = messages(&report.threats);

    assert!(msgs.contains(&"M3U8/HLS playlist URI injection (file://, javascript:, data:)"));
    assert!(msgs.contains(&"Sensitive file path access attempt (/etc/passwd, /proc/self/)"));
    assert!(report.threats.iter().all(|t| t.kind == ThreatKind::Content));
}

#[test]
fn script_in_metadata_is_metadata_kind() {
    let file = create_temp_file(&fixtures::padded_mp4(512));
    let tags = r#"{"format": {"tags": {"comment": "<script>alert(1)</script>"}}}"#;
    let scanner = scanner_with(ScanConfig::default(), StubProber::text(tags));
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert_eq!(
        format_threats(&report.threats),
        "[metadata] Script or injection pattern"
    );
}

#[test]
fn base64_run_reported_only_from_metadata() {
    let run = "TVqQAAMAAAAEAAAA".repeat(22); // 352 chars
    let tags = format!(r#"{{"format": {{"tags": {{"comment": "{run}"}}}}}}"#);

    let file = create_temp_file(&fixtures::padded_mp4(512));
    let scanner = scanner_with(ScanConfig::default(), StubProber::text(tags));
    let report = scanner.scan(file.path(), &CancelToken::new());
    assert_eq!(
        format_threats(&report.threats),
        "[metadata] Large base64-like payload"
    );

    let mut content = fixtures::minimal_mp4();
    content.push(0);
    content.extend_from_slice(run.as_bytes());
    content.push(0);
    let file = create_temp_file(&content);
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());
    assert!(report.is_clean(), "{:?}", report.threats);
}

#[test]
fn findings_keep_pipeline_order() {
    let mut content = fixtures::mp4_with_atom(b"stco", 0xFFFF_FFFF);
    content.extend_from_slice(b"\0powershell -enc AAAA\0");
    let file = create_temp_file(&content);
    let scanner = scanner_with(
        ScanConfig::default(),
        StubProber::text("title=setup.exe"),
    );
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert_eq!(
        format_threats(&report.threats),
        [
            "[metadata] Suspicious executable extension: .exe",
            "[content] MP4 container: suspicious atom size (potential integer overflow in ctts/stts/stsc/co64/stco)",
            "[content] Shell/command execution pattern",
        ]
        .join("\n")
    );
}

#[test]
fn unrecognized_and_swf_files() {
    let file = create_temp_file(&[0x11u8; 256]);
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());
    assert_eq!(
        messages(&report.threats),
        vec!["Unrecognized file format: does not match MP4/MKV/AVI/FLV/ASF/MPEG/OGG signatures"]
    );

    let mut swf = b"CWS\x0a".to_vec();
    swf.extend_from_slice(&300u32.to_le_bytes());
    swf.resize(300, 0x11);
    let file = create_temp_file(&swf);
    let report = scanner.scan(file.path(), &CancelToken::new());
    assert_eq!(
        messages(&report.threats),
        vec![
            "File is SWF/Flash, not a video container (potential exploit vector)",
            "Embedded compressed SWF/Flash detected (potential exploit vector)",
        ]
    );
}

#[test]
fn directories_are_not_content_scanned() {
    let dir = tempfile::tempdir().unwrap();
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let report = scanner.scan(dir.path(), &CancelToken::new());

    assert!(report.is_clean());
    assert!(report.failures.is_empty(), "{:?}", report.failures);
}

#[test]
fn missing_file_is_a_head_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.mp4");
    let scanner = scanner_with(ScanConfig::default(), StubProber::text("<script>"));
    let report = scanner.scan(&path, &CancelToken::new());

    assert_eq!(report.threats.len(), 1);
    assert_eq!(report.threats[0].kind, ThreatKind::Metadata);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].step, ScanStep::Head);
    assert!(!report.is_cancelled());
}

#[test]
fn config_file_drives_window_sizes() {
    let config_file = create_temp_file(
        br#"{"io": {"head_cap": 4096, "tail_cap": 2048, "chunk_size": 512}}"#,
    );
    let config = ScanConfig::load(config_file.path()).unwrap();
    assert_eq!(config, small_window_config());
}

#[test]
fn one_scanner_serves_concurrent_scans() {
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let clean = create_temp_file(&fixtures::padded_mp4(4096));
    let hostile = create_temp_file(&fixtures::mp4_with_atom(b"co64", 0xFFFF_FFFF));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let scanner = &scanner;
                let path = if i % 2 == 0 { clean.path() } else { hostile.path() };
                s.spawn(move || (i, scanner.scan(path, &CancelToken::new())))
            })
            .collect();
        for handle in handles {
            let (i, report) = handle.join().unwrap();
            assert_eq!(report.is_clean(), i % 2 == 0);
        }
    });
}

#[test]
fn real_prober_output_is_clean() {
    let file = create_temp_file(&fixtures::padded_mp4(8192));
    let scanner = scanner_with(
        ScanConfig::default(),
        StubProber::text(crate::common::FFPROBE_CLIP_JSON),
    );
    let report = scanner.scan(file.path(), &CancelToken::new());

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.formatted(), "");
}

#[test]
fn scanners_share_one_catalog() {
    let config = small_window_config();
    let catalog = Arc::new(PatternCatalog::new(&config.text).unwrap());
    let first = Scanner::with_catalog(
        config.clone(),
        Arc::clone(&catalog),
        Box::new(StubProber::text("<script>alert(1)</script>")),
    )
    .unwrap();
    let second = Scanner::with_catalog(
        config,
        Arc::clone(&catalog),
        Box::new(StubProber::text(crate::common::FFPROBE_CLIP_JSON)),
    )
    .unwrap();
    assert_eq!(Arc::strong_count(&catalog), 3);

    let file = create_temp_file(&fixtures::padded_mp4(1024));
    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| first.scan(file.path(), &CancelToken::new()));
        let b = s.spawn(|| second.scan(file.path(), &CancelToken::new()));
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(a.formatted(), "[metadata] Script or injection pattern");
    assert!(b.is_clean());
}

#[test]
fn invalid_config_is_rejected_by_with_catalog() {
    let mut config = ScanConfig::default();
    config.io.chunk_size = 0;
    let err = Scanner::with_catalog(config, PatternCatalog::shared(), Box::new(NoMetadata))
        .unwrap_err();
    assert!(matches!(err, mediascan::ScanError::Config(_)));
}
