#![no_main]
use libfuzzer_sys::fuzz_target;
use mediascan::{NoMetadata, ScanConfig, Scanner};
use once_cell::sync::Lazy;

static SCANNER: Lazy<Scanner> = Lazy::new(|| {
    Scanner::new(ScanConfig::default(), Box::new(NoMetadata)).expect("default scanner")
});

fuzz_target!(|data: &[u8]| {
    let _ = SCANNER.scan_content_bytes(data, data.len() as u64);
});
