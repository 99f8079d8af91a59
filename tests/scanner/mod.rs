//! End-to-end scans through `Scanner::scan`.

mod cancellation;
mod containers;
mod pipeline;

use mediascan::{ScanConfig, Scanner, Threat};

/// Small windows so tail behaviour can be exercised with tiny files.
pub fn small_window_config() -> ScanConfig {
    let mut config = ScanConfig::default();
    config.io.head_cap = 4096;
    config.io.tail_cap = 2048;
    config.io.chunk_size = 512;
    config
}

pub fn messages(threats: &[Threat]) -> Vec<&str> {
    threats.iter().map(|t| t.message.as_str()).collect()
}

pub fn scanner_with(config: ScanConfig, prober: impl mediascan::MetadataProber + 'static) -> Scanner {
    Scanner::new(config, Box::new(prober)).unwrap()
}
