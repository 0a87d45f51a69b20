use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use dipkit_image::{Complex2D, Image};
use dipkit_imgproc::fft::{fft2d, frequency_filter, FrequencyFilter};

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT");

    for size in [64, 128, 256, 512].iter() {
        group.throughput(criterion::Throughput::Elements((*size * *size) as u64));
        let parameter_string = format!("{size}x{size}");

        let samples: Vec<f64> = (0..size * size).map(|i| (i % 251) as f64).collect();
        let matrix = Complex2D::from_real(*size, *size, &samples).unwrap();

        group.bench_with_input(
            BenchmarkId::new("fft2d_forward", &parameter_string),
            &matrix,
            |b, m| {
                b.iter(|| {
                    let mut m = m.clone();
                    black_box(fft2d(&mut m, false))
                })
            },
        );

        let data = samples
            .iter()
            .flat_map(|&v| [v as u8, v as u8, v as u8, 255])
            .collect();
        let image = Image::<u8, 4>::new([*size, *size].into(), data).unwrap();
        let output = Image::<u8, 4>::from_size_val(image.size(), 0).unwrap();
        let filter = FrequencyFilter::LowPass {
            cutoff: *size as f64 / 8.0,
        };

        group.bench_with_input(
            BenchmarkId::new("lowpass_filter", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(frequency_filter(src, &mut dst, &filter)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_fft);
criterion_main!(benches);
