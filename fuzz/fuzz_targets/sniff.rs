#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = mediascan::sniff(data);
    let _ = mediascan::sniff::starts_with_executable(data);
    let _ = mediascan::sniff::starts_with_swf(data);
});
