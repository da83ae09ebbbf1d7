#![no_main]

use libfuzzer_sys::fuzz_target;
use recoverjpeg_core::{probe, Probe};

fuzz_target!(|data: &[u8]| {
    for max_size in [4, 64, 4096, 6 * 1024 * 1024] {
        if let Probe::Accepted { length } = probe(data, max_size) {
            assert!(length >= 4 && length <= data.len());
            assert_eq!(&data[..2], &[0xFF, 0xD8]);
            assert_eq!(&data[length - 2..length], &[0xFF, 0xD9]);
        }
    }
});
