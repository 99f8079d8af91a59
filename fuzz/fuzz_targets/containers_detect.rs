#![no_main]
use libfuzzer_sys::fuzz_target;
use mediascan::config::OverflowLimits;
use mediascan::containers::detect_overflows;

fuzz_target!(|data: &[u8]| {
    let limits = OverflowLimits::default();
    // Both with the real size and with the size unknown.
    let _ = detect_overflows(data, data.len() as u64, &limits);
    let _ = detect_overflows(data, 0, &limits);
});
