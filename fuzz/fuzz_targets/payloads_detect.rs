#![no_main]
use libfuzzer_sys::fuzz_target;
use mediascan::config::PayloadLimits;
use mediascan::payloads::detect_payloads;
use mediascan::WindowOrigin;

fuzz_target!(|data: &[u8]| {
    let limits = PayloadLimits::default();
    let _ = detect_payloads(data, WindowOrigin::Head, &limits);
    let _ = detect_payloads(data, WindowOrigin::Tail, &limits);
});
