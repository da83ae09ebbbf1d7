#![no_main]

use libfuzzer_sys::fuzz_target;
use recoverjpeg_core::{ImageSink, JpegCarver, NoProgress, RecoveredImage, Result, ScanConfig};

struct CheckSink<'a> {
    input: &'a [u8],
    next_index: u64,
}

impl ImageSink for CheckSink<'_> {
    fn write_image(&mut self, image: &RecoveredImage<'_>) -> Result<()> {
        let start = image.offset as usize;
        assert_eq!(image.index, self.next_index);
        assert_eq!(&self.input[start..start + image.data.len()], image.data);
        self.next_index += 1;
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let config = ScanConfig {
        block_size: 16,
        max_size: 4096,
        ..Default::default()
    };
    let carver = JpegCarver::with_config(config).unwrap();
    let sink = CheckSink {
        input: data,
        next_index: 0,
    };
    let summary = carver.scan(data, sink, NoProgress).unwrap();
    assert!(summary.recovered <= data.len() as u64 / 4);
});
