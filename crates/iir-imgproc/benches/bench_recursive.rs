use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use iir_image::Image;
use iir_imgproc::filter::{recursive_gradient, recursive_smooth_with_strategy};
use iir_imgproc::parallel::ExecutionStrategy;

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;

fn bench_recursive(c: &mut Criterion) {
    let mut group = c.benchmark_group("Recursive Smooth");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for scale in [1.0, 4.0].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{}x{}x{}", width, height, scale);

            // input image
            let image_data = (0..width * height)
                .map(|i| (i % 251) as f32)
                .collect::<Vec<_>>();
            let image_size = [*width, *height].into();

            let image_f32 = Image::<_, 1>::new(image_size, image_data).unwrap();
            let image_u8 = image_f32.cast::<u8>().unwrap();

            // output image
            let output_f32 = Image::<f32, 1>::from_size_val(image_size, 0.0).unwrap();
            let output_u8 = output_f32.cast::<u8>().unwrap();

            for (name, strategy) in [
                ("serial", ExecutionStrategy::Serial),
                ("parallel", ExecutionStrategy::Parallel),
            ] {
                group.bench_with_input(
                    BenchmarkId::new(format!("recursive_smooth_f32_{name}"), &parameter_string),
                    &(&image_f32, &output_f32),
                    |b, i| {
                        let (src, mut dst) = (i.0, i.1.clone());
                        b.iter(|| {
                            black_box(recursive_smooth_with_strategy(
                                src,
                                &mut dst,
                                (*scale, *scale),
                                strategy,
                            ))
                        })
                    },
                );
            }

            group.bench_with_input(
                BenchmarkId::new("recursive_smooth_u8", &parameter_string),
                &(&image_u8, &output_u8),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(recursive_smooth_with_strategy(
                            src,
                            &mut dst,
                            (*scale, *scale),
                            ExecutionStrategy::Auto,
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("recursive_gradient_f32", &parameter_string),
                &(&image_f32, &output_f32),
                |b, i| {
                    let (src, mut gx, mut gy) = (i.0, i.1.clone(), i.1.clone());
                    b.iter(|| black_box(recursive_gradient(src, &mut gx, &mut gy, *scale)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_imageproc", &parameter_string),
                &image_u8,
                |b, i| {
                    let gray_image =
                        GrayImage::from_raw(i.cols() as u32, i.rows() as u32, i.as_slice().to_vec())
                            .unwrap();
                    let sigma = *scale as f32;
                    b.iter(|| black_box(gaussian_blur_f32(&gray_image, sigma)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_recursive);
criterion_main!(benches);
