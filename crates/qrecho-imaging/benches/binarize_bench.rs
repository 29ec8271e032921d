// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the adaptive binarizer in the qrecho-imaging crate.
// Compares the summed-area-table binarizer (sequential and row-parallel)
// against the direct window scan on a synthetic unevenly lit photograph.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use qrecho_core::BinarizerConfig;
use qrecho_core::types::RgbaFrame;
use qrecho_imaging::{AdaptiveBinarizer, binarize_reference};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 320x240 frame: 8-pixel checker modules under a left-to-right lighting
/// gradient, so a global threshold would fail but a local one does not.
fn lit_checker(width: u32, height: u32) -> RgbaFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let light = 60 + (x * 150 / width);
            let v = if (x / 8 + y / 8) % 2 == 0 { light } else { light / 3 };
            let v = v.min(255) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RgbaFrame { width, height, data }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_binarize(c: &mut Criterion) {
    let frame = lit_checker(320, 240);

    let sequential = AdaptiveBinarizer::with_window(11).expect("valid window");
    c.bench_function("binarize summed-area (320x240, w11)", |b| {
        b.iter(|| {
            let mut work = black_box(frame.clone());
            sequential.binarize_frame(&mut work).expect("valid frame");
            black_box(work);
        });
    });

    let parallel = AdaptiveBinarizer::new(BinarizerConfig {
        window_size: 11,
        parallel: true,
    })
    .expect("valid window");
    c.bench_function("binarize summed-area parallel (320x240, w11)", |b| {
        b.iter(|| {
            let mut work = black_box(frame.clone());
            parallel.binarize_frame(&mut work).expect("valid frame");
            black_box(work);
        });
    });

    c.bench_function("binarize reference scan (320x240, w11)", |b| {
        b.iter(|| {
            let mut work = black_box(frame.clone());
            binarize_reference(&mut work.data, work.width, work.height, 11).expect("valid frame");
            black_box(work);
        });
    });
}

criterion_group!(benches, bench_binarize);
criterion_main!(benches);
