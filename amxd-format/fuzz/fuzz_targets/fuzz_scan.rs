#![no_main]

use amxd_format::ChunkScanner;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut scanner = ChunkScanner::new(data);
    let mut end = 0;
    for chunk in scanner.by_ref() {
        assert_eq!(chunk.offset, end);
        end = chunk.end();
    }
    assert!(scanner.position() <= data.len());
});
