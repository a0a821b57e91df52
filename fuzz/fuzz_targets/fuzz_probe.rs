#![no_main]

use libfuzzer_sys::fuzz_target;

// No limits: oversized first frames must fail through the allocator check, not abort.
fuzz_target!(|data: &[u8]| {
    if let Ok(result) = gifprobe::from_bytes(data, &gifprobe::Limits::none()) {
        assert!(result.frames > 0);
        assert!(result.max_colors <= 256);
    }
});
