#![no_main]

use amxd_format::patcher::{to_pretty_string, PrettyStyle};
use amxd_format::{assemble, unwrap_container, DeviceCode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary containers must decode or fail cleanly.
    if let Ok(unwrapped) = unwrap_container(data) {
        let pretty = to_pretty_string(&unwrapped.patcher, PrettyStyle::Utf8)
            .expect("pretty print parsed patcher");

        // Re-wrapping the extracted document must reproduce it.
        let rewrapped = assemble(pretty.as_bytes(), DeviceCode::default())
            .expect("re-wrap extracted patcher");
        let again = unwrap_container(&rewrapped).expect("unwrap re-wrapped container");
        assert_eq!(again.patcher, unwrapped.patcher);
    }

    // Raw input treated as patcher JSON never panics the assembler.
    let _ = assemble(data, DeviceCode::default());
});
