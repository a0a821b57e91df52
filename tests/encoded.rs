//! Probes of GIFs produced by an independent encoder.

use std::borrow::Cow;

use gifprobe::{LimitExceeded, Limits, ProbeError};

const PALETTE_4: [u8; 12] = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];

struct TestFrame {
    indices: Vec<u8>,
    transparent: Option<u8>,
    delay: u16,
    dispose: gif::DisposalMethod,
    palette: Option<Vec<u8>>,
}

impl TestFrame {
    fn opaque(indices: Vec<u8>, delay: u16) -> Self {
        Self {
            indices,
            transparent: None,
            delay,
            dispose: gif::DisposalMethod::Keep,
            palette: None,
        }
    }
}

fn encode(width: u16, height: u16, global: &[u8], frames: &[TestFrame]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width, height, global).unwrap();
        for test_frame in frames {
            let frame = gif::Frame {
                width,
                height,
                delay: test_frame.delay,
                dispose: test_frame.dispose,
                transparent: test_frame.transparent,
                palette: test_frame.palette.clone(),
                buffer: Cow::Borrowed(&test_frame.indices),
                ..gif::Frame::default()
            };
            encoder.write_frame(&frame).unwrap();
        }
    }
    out
}

fn gradient(len: usize, colors: u8) -> Vec<u8> {
    (0..len).map(|i| (i % usize::from(colors)) as u8).collect()
}

#[test]
fn opaque_animation_sums_delays() {
    let gif = encode(
        16,
        8,
        &PALETTE_4,
        &[
            TestFrame::opaque(gradient(128, 4), 10),
            TestFrame::opaque(gradient(128, 3), 25),
            TestFrame::opaque(vec![1; 128], 5),
        ],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(!result.alpha);
    assert_eq!(result.frames, 3);
    assert_eq!(result.duration, 400);
    assert_eq!(result.max_colors, 4);
    assert_eq!((result.width, result.height), (16, 8));
}

#[test]
fn used_transparent_index_in_first_frame() {
    let mut indices = vec![1u8; 64 * 64];
    indices[64 * 63 + 40] = 3;

    let gif = encode(
        64,
        64,
        &PALETTE_4,
        &[TestFrame {
            transparent: Some(3),
            ..TestFrame::opaque(indices, 0)
        }],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(result.alpha);
    assert_eq!(result.frames, 1);
}

#[test]
fn declared_but_unused_transparent_index() {
    let gif = encode(
        64,
        64,
        &PALETTE_4,
        &[TestFrame {
            transparent: Some(3),
            ..TestFrame::opaque(gradient(64 * 64, 3), 4)
        }],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(!result.alpha);
    assert_eq!(result.duration, 40);
}

#[test]
fn transparency_in_later_frames_is_not_decoded() {
    let gif = encode(
        8,
        8,
        &PALETTE_4,
        &[
            TestFrame::opaque(vec![0; 64], 1),
            TestFrame {
                transparent: Some(2),
                ..TestFrame::opaque(vec![2; 64], 1)
            },
        ],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(!result.alpha);
    assert_eq!(result.frames, 2);
}

#[test]
fn background_disposal_after_first_frame_stops_the_scan() {
    let gif = encode(
        8,
        8,
        &PALETTE_4,
        &[
            TestFrame::opaque(vec![0; 64], 10),
            TestFrame {
                dispose: gif::DisposalMethod::Background,
                ..TestFrame::opaque(vec![1; 64], 10)
            },
            TestFrame::opaque(vec![2; 64], 10),
            TestFrame::opaque(vec![3; 64], 10),
        ],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(result.alpha);
    assert_eq!(result.frames, 2);
    assert_eq!(result.duration, 200);
}

#[test]
fn background_disposal_on_first_frame_is_ignored() {
    let gif = encode(
        8,
        8,
        &PALETTE_4,
        &[
            TestFrame {
                dispose: gif::DisposalMethod::Background,
                ..TestFrame::opaque(vec![0; 64], 10)
            },
            TestFrame::opaque(vec![1; 64], 10),
        ],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(!result.alpha);
    assert_eq!(result.frames, 2);
}

#[test]
fn local_palette_raises_max_colors() {
    let local: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();
    let gif = encode(
        16,
        16,
        &PALETTE_4,
        &[
            TestFrame::opaque(gradient(256, 4), 0),
            TestFrame {
                palette: Some(local),
                ..TestFrame::opaque((0..=255).collect(), 0)
            },
        ],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert_eq!(result.max_colors, 256);
}

#[test]
fn large_first_frame_with_full_code_table() {
    // Enough distinct runs to fill the 4096-entry table and force clears.
    let local: Vec<u8> = (0..=255u8).flat_map(|v| [v, 0, 255 - v]).collect();
    let mut indices: Vec<u8> = (0..256 * 256)
        .map(|i: usize| ((i * 31 + i / 7) % 255) as u8)
        .collect();
    *indices.last_mut().unwrap() = 255;

    let gif = encode(
        256,
        256,
        &[],
        &[TestFrame {
            transparent: Some(255),
            palette: Some(local),
            ..TestFrame::opaque(indices, 0)
        }],
    );

    let result = gifprobe::from_bytes(&gif, &Limits::none()).unwrap();
    assert!(result.alpha);
    assert_eq!(result.max_colors, 256);
}

#[test]
fn pixel_budget_rejects_before_any_frame() {
    let gif = encode(100, 100, &PALETTE_4, &[TestFrame::opaque(vec![0; 10_000], 0)]);

    let limits = Limits::none().with_max_pixels(9_999);
    let err = gifprobe::from_bytes(&gif, &limits).unwrap_err();
    assert!(matches!(
        err,
        ProbeError::ResourceExceeded(LimitExceeded::Pixels {
            actual: 10_000,
            limit: 9_999
        })
    ));

    let limits = Limits::none().with_max_pixels(10_000);
    assert!(gifprobe::from_bytes(&gif, &limits).is_ok());
}

#[test]
fn duration_budget_counts_cumulative_delay() {
    let gif = encode(
        4,
        4,
        &PALETTE_4,
        &[
            TestFrame::opaque(vec![0; 16], 100),
            TestFrame::opaque(vec![1; 16], 100),
        ],
    );

    let limits = Limits::none().with_max_duration(1_999);
    let err = gifprobe::from_bytes(&gif, &limits).unwrap_err();
    assert!(matches!(
        err,
        ProbeError::ResourceExceeded(LimitExceeded::Duration { actual: 2_000, .. })
    ));

    let limits = Limits::none().with_max_duration(2_000);
    assert_eq!(gifprobe::from_bytes(&gif, &limits).unwrap().duration, 2_000);
}

#[test]
fn memory_budget_covers_first_frame_indices() {
    let gif = encode(
        64,
        64,
        &PALETTE_4,
        &[TestFrame {
            transparent: Some(3),
            ..TestFrame::opaque(vec![0; 64 * 64], 0)
        }],
    );

    // 12 bytes of global table plus 4096 indices.
    let limits = Limits::none().with_max_memory(12 + 4096 - 1);
    let err = gifprobe::from_bytes(&gif, &limits).unwrap_err();
    assert!(err.is_resource_exceeded());

    let limits = Limits::none().with_max_memory(12 + 4096);
    assert!(!gifprobe::from_bytes(&gif, &limits).unwrap().alpha);
}

#[test]
fn truncated_stream_is_malformed() {
    let gif = encode(
        8,
        8,
        &PALETTE_4,
        &[
            TestFrame::opaque(vec![0; 64], 1),
            TestFrame::opaque(vec![1; 64], 1),
        ],
    );

    for cut in [3, 10, 20, gif.len() / 2, gif.len() - 1] {
        let err = gifprobe::from_bytes(&gif[..cut], &Limits::none()).unwrap_err();
        assert!(err.is_malformed(), "cut at {cut}: {err}");
    }
}
