use crate::estimate::LineSegment;
use image::GrayImage;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Fixed seed for the random scan order, so repeated runs over the same
/// edge map produce the same segments.
const SCAN_SEED: u64 = 0x8f3c_9a1d_77b4_e02a;

/// Tuning knobs of the progressive probabilistic Hough transform.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct HoughParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f64,
    /// Angle resolution of the accumulator, in radians.
    pub theta: f64,
    /// Minimum number of accumulator votes before a candidate line is traced.
    pub threshold: u32,
    /// Minimum accepted segment extent, in pixels, measured along the
    /// dominant axis of the segment.
    pub min_line_length: u32,
    /// Maximum run of non-edge pixels bridged while tracing a segment.
    pub max_line_gap: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            threshold: 80,
            min_line_length: 100,
            max_line_gap: 20,
        }
    }
}

/// Extracts line segments from a binary edge map with a progressive
/// probabilistic Hough transform.
///
/// Edge pixels are visited in random order. Each visited pixel votes for
/// every discretized line orientation through it; once some accumulator
/// cell passes the vote threshold, the supporting line is traced through
/// the edge map in both directions, bridging gaps up to
/// [`HoughParams::max_line_gap`]. Pixels supporting a traced candidate are
/// retired so they cannot seed further candidates, and an accepted
/// candidate additionally withdraws its votes from the accumulator.
///
/// Any pixel with a nonzero value counts as an edge pixel.
pub fn hough_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    let numangle = (std::f64::consts::PI / params.theta).round().max(1.0) as usize;
    let numrho = (((width + height) as f64 * 2.0 + 1.0) / params.rho).round() as usize;
    let rho_offset = (numrho as i32 - 1) / 2;
    let irho = params.rho.recip();
    let trig: Vec<(f64, f64)> = (0..numangle)
        .map(|n| {
            let angle = n as f64 * params.theta;
            (angle.cos() * irho, angle.sin() * irho)
        })
        .collect();

    let mut mask = vec![false; width as usize * height as usize];
    let mut points = Vec::new();
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel[0] > 0 {
            mask[y as usize * width as usize + x as usize] = true;
            points.push((x, y));
        }
    }
    debug!("hough transform over {} edge pixels", points.len());

    let mut accum = vec![0i32; numangle * numrho];
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(SCAN_SEED);
    let mut segments = Vec::new();

    while !points.is_empty() {
        let index = rng.gen_range(0..points.len());
        let (x, y) = points.swap_remove(index);
        // The pixel may already have been absorbed into an earlier segment.
        if !mask[y as usize * width as usize + x as usize] {
            continue;
        }

        // Vote for every orientation through this pixel and remember the
        // best supported one.
        let mut best_angle = 0;
        let mut best_votes = 0;
        for (n, &(c, s)) in trig.iter().enumerate() {
            let r = ((x as f64 * c + y as f64 * s).round() as i32 + rho_offset) as usize;
            let cell = &mut accum[n * numrho + r];
            *cell += 1;
            if *cell > best_votes {
                best_votes = *cell;
                best_angle = n;
            }
        }
        if best_votes < params.threshold as i32 {
            continue;
        }

        // Trace the supporting line through the edge map in both directions.
        let angle = best_angle as f64 * params.theta;
        let (sin_t, cos_t) = angle.sin_cos();
        let tangent = (-sin_t, cos_t);
        let (fwd_end, fwd_pixels) = walk(&mask, width, height, (x, y), tangent, params);
        let (back_end, back_pixels) = walk(
            &mask,
            width,
            height,
            (x, y),
            (-tangent.0, -tangent.1),
            params,
        );

        let good_line = (fwd_end.0 - back_end.0).abs() >= params.min_line_length as i64
            || (fwd_end.1 - back_end.1).abs() >= params.min_line_length as i64;

        // Retire every supporting pixel so it cannot seed another candidate.
        // An accepted candidate also withdraws its votes, keeping the
        // accumulator from re-reporting the same line.
        for &(px, py) in fwd_pixels
            .iter()
            .chain(back_pixels.iter())
            .chain(std::iter::once(&(x, y)))
        {
            mask[py as usize * width as usize + px as usize] = false;
            if good_line {
                for (n, &(c, s)) in trig.iter().enumerate() {
                    let r = ((px as f64 * c + py as f64 * s).round() as i32 + rho_offset) as usize;
                    accum[n * numrho + r] -= 1;
                }
            }
        }

        if good_line {
            trace!(
                "accepted segment ({}, {}) -> ({}, {}) at angle bin {}",
                back_end.0,
                back_end.1,
                fwd_end.0,
                fwd_end.1,
                best_angle
            );
            segments.push(LineSegment::from_pixels(
                back_end.0 as i32,
                back_end.1 as i32,
                fwd_end.0 as i32,
                fwd_end.1 as i32,
            ));
        }
    }

    debug!("hough transform produced {} segments", segments.len());
    segments
}

/// Walks from `seed` along `direction`, one pixel per step on the dominant
/// axis, until the image border or a gap longer than
/// [`HoughParams::max_line_gap`] is hit. Returns the furthest edge pixel
/// reached and every edge pixel passed on the way.
fn walk(
    mask: &[bool],
    width: u32,
    height: u32,
    seed: (u32, u32),
    direction: (f64, f64),
    params: &HoughParams,
) -> ((i64, i64), Vec<(u32, u32)>) {
    let (step_x, step_y) = if direction.0.abs() >= direction.1.abs() {
        (direction.0.signum(), direction.1 / direction.0.abs())
    } else {
        (direction.0 / direction.1.abs(), direction.1.signum())
    };

    let mut fx = seed.0 as f64;
    let mut fy = seed.1 as f64;
    let mut end = (seed.0 as i64, seed.1 as i64);
    let mut passed = Vec::new();
    let mut gap = 0;
    loop {
        fx += step_x;
        fy += step_y;
        let xi = fx.round() as i64;
        let yi = fy.round() as i64;
        if xi < 0 || yi < 0 || xi >= width as i64 || yi >= height as i64 {
            break;
        }
        if mask[yi as usize * width as usize + xi as usize] {
            gap = 0;
            end = (xi, yi);
            passed.push((xi as u32, yi as u32));
        } else {
            gap += 1;
            if gap > params.max_line_gap {
                break;
            }
        }
    }
    (end, passed)
}
