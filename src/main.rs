use image::{imageops::FilterType, DynamicImage, ImageOutputFormat};
use log::{error, info};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;
use vpfind::{
    contour_map, draw_solution_mut, hough_segments, render_segments, render_solution_overlay,
    ExtractParams, HoughParams, VanishingPointEstimator,
};

#[derive(Copy, Clone, Debug)]
enum View {
    Lines,
    Contours,
    Original,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lines" => Ok(View::Lines),
            "contours" => Ok(View::Contours),
            "original" => Ok(View::Original),
            other => Err(format!("unknown view `{}`", other)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "vpfind",
    about = "Finds the point where straight edges in a photograph converge"
)]
struct Opt {
    /// Working image width the input is resized to before detection.
    #[structopt(long, default_value = "800")]
    width: u32,
    /// Working image height.
    #[structopt(long, default_value = "600")]
    height: u32,
    /// Lower Canny hysteresis threshold.
    ///
    /// The default is higher than usual because the reference use targets
    /// brightly lit structure and treats dimmer detail as clutter.
    #[structopt(long, default_value = "250")]
    canny_low: f32,
    /// Upper Canny hysteresis threshold.
    #[structopt(long, default_value = "500")]
    canny_high: f32,
    /// Erosion radius applied to the contour map (0 disables).
    #[structopt(long, default_value = "0")]
    erode: u8,
    /// Minimum accumulator votes before a Hough line is considered.
    #[structopt(long, default_value = "80")]
    threshold: u32,
    /// Minimum accepted segment length in pixels.
    #[structopt(long, default_value = "100")]
    min_line_length: u32,
    /// Maximum bridged gap along a single segment, in pixels.
    #[structopt(long, default_value = "20")]
    max_line_gap: u32,
    /// Which rendering to emit: lines, contours, or original.
    #[structopt(long, default_value = "lines")]
    view: View,
    /// The output path to write to (autodetects image type from extension).
    ///
    /// If this is not provided, then the output goes to stdout as a PNG.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// The photograph to search for a vanishing point.
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() {
    pretty_env_logger::init();
    let opt = Opt::from_args();

    let params = ExtractParams {
        canny_low: opt.canny_low,
        canny_high: opt.canny_high,
        erode_radius: opt.erode,
        hough: HoughParams {
            threshold: opt.threshold,
            min_line_length: opt.min_line_length,
            max_line_gap: opt.max_line_gap,
            ..Default::default()
        },
    };

    let image = image::open(&opt.input).expect("failed to open image file");
    let image = image.resize_exact(opt.width, opt.height, FilterType::Triangle);

    let map = contour_map(&image, &params);
    let segments = hough_segments(&map, &params.hough);
    info!("detected {} line segments", segments.len());

    let solution = match VanishingPointEstimator::new().estimate(&segments) {
        Ok(point) => point,
        Err(err) => {
            error!("estimation failed: {}", err);
            std::process::exit(1);
        }
    };
    println!(
        "solution = {}, {}",
        solution.x.round() as i64,
        solution.y.round() as i64
    );

    let output = match opt.view {
        View::Lines => {
            let mut canvas = render_segments(opt.width, opt.height, &segments);
            draw_solution_mut(&mut canvas, solution);
            DynamicImage::ImageRgba8(canvas)
        }
        View::Contours => DynamicImage::ImageLuma8(map),
        View::Original => render_solution_overlay(&image, solution),
    };

    if let Some(path) = opt.output {
        output.save(path).expect("failed to write image");
    } else {
        let mut buffer = Cursor::new(Vec::new());
        output
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .expect("failed to encode PNG");
        std::io::stdout()
            .write_all(buffer.get_ref())
            .expect("failed to write image to stdout");
    }
}
