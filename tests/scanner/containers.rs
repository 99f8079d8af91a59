use super::{messages, scanner_with};
use crate::common::fixtures;
use crate::common::test_utils::create_temp_file;
use mediascan::{sniff, CancelToken, ContainerFormat, NoMetadata, ScanConfig};

const MP4_OVERFLOW: &str =
    "MP4 container: suspicious atom size (potential integer overflow in ctts/stts/stsc/co64/stco)";
const MKV_OVERFLOW: &str = "MKV/WebM EBML: suspicious element size (potential overflow exploit)";

/// A Matroska prefix inside a file large enough to hold its element.
fn padded_mkv(element_size: u64) -> Vec<u8> {
    let mut data = fixtures::mkv_with_element(element_size);
    data.resize(element_size as usize + 64, 0);
    data
}

fn scan_bytes(content: &[u8]) -> Vec<String> {
    let file = create_temp_file(content);
    let scanner = scanner_with(ScanConfig::default(), NoMetadata);
    let report = scanner.scan(file.path(), &CancelToken::new());
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    messages(&report.threats)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn mp4_co64_overflow() {
    assert_eq!(
        scan_bytes(&fixtures::mp4_with_atom(b"co64", 0xFFFF_FFFF)),
        vec![MP4_OVERFLOW]
    );
    assert!(scan_bytes(&fixtures::mp4_with_atom(b"co64", 100)).is_empty());
}

#[test]
fn mkv_element_size() {
    let huge = fixtures::mkv_with_element(300 * 1024 * 1024);
    assert_eq!(sniff(&huge), ContainerFormat::Mkv);
    assert_eq!(scan_bytes(&huge), vec![MKV_OVERFLOW]);
    assert!(scan_bytes(&padded_mkv(1024)).is_empty());
}

#[test]
fn mkv_element_larger_than_real_file() {
    // 64 KiB element in a file of a few dozen bytes.
    let content = fixtures::mkv_with_element(64 * 1024);
    assert_eq!(scan_bytes(&content), vec![MKV_OVERFLOW]);
}

#[test]
fn mkv_block_payload_is_not_an_element_size() {
    // Coded frame bytes that look like a 5-byte size vint.
    let frames: [&[u8]; 2] = [
        &[0x0C, 0xD3, 0x91, 0x7E, 0x55, 0x10, 0x0A],
        &[0x0F, 0xFF, 0xFF, 0xFE, 0x00],
    ];
    let mut content = fixtures::mkv_with_blocks(&frames);
    content.resize(4096, 0);
    assert_eq!(sniff(&content), ContainerFormat::Mkv);
    assert!(scan_bytes(&content).is_empty());
}

#[test]
fn mkv_executable_attachment() {
    let mut content = fixtures::mkv_with_element(1024);
    content.extend_from_slice(b"\x61\xa7\x46\x6e\x8bpayload.exe\x46\x60");
    content.resize(2048, 0);
    assert_eq!(
        scan_bytes(&content),
        vec!["MKV: attached file with executable extension (.exe/.dll/etc)"]
    );
}

#[test]
fn avi_chunk_all_ones() {
    let mut content = b"RIFF\0\x10\0\0AVI LIST\x04\0\0\0hdrl".to_vec();
    content.extend_from_slice(b"movi\xff\xff\xff\xff");
    content.resize(256, 0);
    assert_eq!(
        scan_bytes(&content),
        vec!["AVI/RIFF container: suspicious chunk size (potential overflow exploit)"]
    );
}

#[test]
fn transport_stream_psi_overflow() {
    let mut content = Vec::new();
    for k in 0..4 {
        let mut packet = vec![0x47, if k == 0 { 0x40 } else { 0x00 }, 0x00, 0x10];
        if k == 0 {
            packet.extend_from_slice(&[0x00, 0x00, 0xBF, 0xFF]);
        }
        packet.resize(188, 0xFF);
        content.extend(packet);
    }
    assert_eq!(sniff(&content), ContainerFormat::MpegTs);
    assert_eq!(
        scan_bytes(&content),
        vec!["MPEG-TS: suspicious section length in PSI (potential overflow)"]
    );
}

#[test]
fn clean_transport_stream_is_recognized() {
    let mut content = Vec::new();
    for _ in 0..4 {
        let mut packet = vec![0x47, 0x40, 0x00, 0x10, 0x00, 0x00, 0xB0, 0x0D];
        packet.resize(188, 0xFF);
        content.extend(packet);
    }
    assert!(scan_bytes(&content).is_empty());
}

#[test]
fn polyglot_runs_every_matching_detector() {
    // RealMedia header whose first chunk is absurd, with an MP4 brand and an
    // oversized sample table further in.
    let mut content = b".RMF\xff\xff\xff\xff".to_vec();
    content.extend(fixtures::mp4_with_atom(b"ctts", 0x7FFF_0000));
    let msgs = scan_bytes(&content);
    assert_eq!(
        msgs,
        vec![
            MP4_OVERFLOW,
            "RealMedia container: suspicious chunk size (potential overflow exploit)",
        ]
    );
}
