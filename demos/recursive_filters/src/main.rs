use argh::FromArgs;

use iir::image::{ops, Image, ImageSize};
use iir::imgproc::{corners, edges, filter, parallel::ExecutionStrategy};

#[derive(FromArgs)]
/// Run the recursive exponential filters on a synthetic image and log the results
struct Args {
    /// width and height of the synthetic image
    #[argh(option, short = 's', default = "256")]
    size: usize,

    /// scale of the exponential filters
    #[argh(option, default = "2.0")]
    scale: f64,

    /// minimum DoE difference across an edge
    #[argh(option, default = "0.02")]
    threshold: f64,

    /// trace weight of the corner response
    #[argh(option, default = "0.04")]
    k: f64,

    /// run on the current thread only
    #[argh(switch)]
    serial: bool,
}

/// A dark background with a bright rectangle and a mid-gray square per channel.
fn synthetic_image(size: usize) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let mut image = Image::<u8, 3>::from_size_val([size, size].into(), 20)?;
    let (q, h) = (size / 4, size / 2);

    for y in q..q + h {
        for x in q / 2..q / 2 + h {
            image.set_pixel(x, y, 0, 230)?;
        }
    }
    for y in h..h + q {
        for x in h..h + q {
            for ch in 1..3 {
                image.set_pixel(x, y, ch, 128)?;
            }
        }
    }
    Ok(image)
}

fn stats(values: &[f32]) -> (f32, f32, f32) {
    let (min, max, sum) = values
        .iter()
        .fold((f32::MAX, f32::MIN, 0.0), |(lo, hi, sum), &v| {
            (lo.min(v), hi.max(v), sum + v)
        });
    (min, max, sum / values.len().max(1) as f32)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let strategy = if args.serial {
        ExecutionStrategy::Serial
    } else {
        ExecutionStrategy::Auto
    };

    let image = synthetic_image(args.size)?;
    let size: ImageSize = image.size();
    log::info!("synthetic image: {}", size);

    // normalize the image between 0 and 1
    let mut image_f32 = Image::<f32, 3>::from_size_val(size, 0.0)?;
    ops::cast_and_scale(&image, &mut image_f32, 1.0 / 255.0)?;

    // smooth all channels at once
    let mut smoothed = Image::<f32, 3>::from_size_val(size, 0.0)?;
    filter::recursive_smooth_with_strategy(
        &image_f32,
        &mut smoothed,
        (args.scale, args.scale),
        strategy,
    )?;

    for (ch, channel) in smoothed.split_channels()?.iter().enumerate() {
        let (min, max, mean) = stats(channel.as_slice());
        log::info!("smoothed channel {ch}: min={min:.4} max={max:.4} mean={mean:.4}");
    }

    // gray as the mean of the channels
    let gray_data = image_f32
        .as_slice()
        .chunks_exact(3)
        .map(|px| px.iter().sum::<f32>() / 3.0)
        .collect();
    let gray = Image::<f32, 1>::new(size, gray_data)?;

    let mut gx = Image::<f32, 1>::from_size_val(size, 0.0)?;
    let mut gy = Image::<f32, 1>::from_size_val(size, 0.0)?;
    filter::recursive_gradient(&gray, &mut gx, &mut gy, args.scale)?;
    let (_, max_gx, _) = stats(gx.as_slice());
    let (_, max_gy, _) = stats(gy.as_slice());
    log::info!("gradient: max gx={max_gx:.4} max gy={max_gy:.4}");

    let mut edge_image = Image::<u8, 1>::from_size_val(size, 0)?;
    let edge_config = edges::DoeEdgeConfig::default()
        .with_scale(args.scale)
        .with_gradient_threshold(args.threshold)
        .with_edge_marker(255.0);
    let num_crossings =
        edges::difference_of_exponential_edge_image(&gray, &mut edge_image, &edge_config)?;
    let num_edge_pixels = edge_image.as_slice().iter().filter(|&&v| v == 255).count();
    log::info!("DoE edges: {num_crossings} zero crossings, {num_edge_pixels} edge pixels");

    let mut response = Image::<f32, 1>::from_size_val(size, 0.0)?;
    let corner_config = corners::CornerResponseConfig::default()
        .with_scale(args.scale)
        .with_k(args.k);
    corners::corner_response(&gray, &mut response, &corner_config)?;

    let (best_idx, best) = response
        .as_slice()
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });
    log::info!(
        "strongest corner at ({}, {}) with response {:.6}",
        best_idx % size.width.max(1),
        best_idx / size.width.max(1),
        best
    );

    Ok(())
}
