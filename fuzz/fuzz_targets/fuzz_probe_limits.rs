#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    max_width: Option<u16>,
    max_height: Option<u16>,
    max_pixels: Option<u32>,
    max_memory: Option<u32>,
    max_duration: Option<u32>,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let limits = gifprobe::Limits {
        max_width: input.max_width.map(u64::from),
        max_height: input.max_height.map(u64::from),
        max_pixels: input.max_pixels.map(u64::from),
        max_memory_bytes: input.max_memory.map(u64::from),
        max_duration_ms: input.max_duration.map(u64::from),
    };

    let Ok(result) = gifprobe::from_bytes(&input.data, &limits) else {
        return;
    };

    let within = |limit: Option<u64>, actual: u64| limit.is_none_or(|l| l == 0 || actual <= l);
    assert!(within(limits.max_width, u64::from(result.width)));
    assert!(within(limits.max_height, u64::from(result.height)));
    assert!(within(
        limits.max_pixels,
        u64::from(result.width) * u64::from(result.height)
    ));
    assert!(within(limits.max_duration_ms, result.duration));
});
