//! Procedurally drawn banners.

use campaign_core::QualityLabel;
use image::{Rgb, RgbImage};
use rand::Rng;

pub const CELEBRATION_WIDTH: u32 = 800;
pub const CELEBRATION_HEIGHT: u32 = 400;
pub const LOGO_WIDTH: u32 = 600;
pub const LOGO_HEIGHT: u32 = 300;

const CONFETTI_COUNT: usize = 40;
const LOGO_BACKGROUND: [u8; 3] = [73, 109, 137];
const LOGO_ACCENT: [u8; 3] = [0xC8, 0xE5, 0x46];
const WHITE: [u8; 3] = [255, 255, 255];

/// Top and bottom gradient colors for a quality label.
fn gradient(quality: QualityLabel) -> ([u8; 3], [u8; 3]) {
    match quality {
        QualityLabel::Excellent => ([255, 215, 0], [255, 165, 0]),
        QualityLabel::Good => ([144, 238, 144], [60, 179, 113]),
        QualityLabel::Normal => ([173, 216, 230], [70, 130, 180]),
    }
}

/// Draw the celebration banner: vertical gradient, a badge and confetti.
pub fn draw_celebration<R: Rng>(quality: QualityLabel, rng: &mut R) -> RgbImage {
    let (top, bottom) = gradient(quality);
    let mut img = RgbImage::new(CELEBRATION_WIDTH, CELEBRATION_HEIGHT);

    for y in 0..CELEBRATION_HEIGHT {
        let t = y as f32 / CELEBRATION_HEIGHT as f32;
        let row = [
            lerp(top[0], bottom[0], t),
            lerp(top[1], bottom[1], t),
            lerp(top[2], bottom[2], t),
        ];
        for x in 0..CELEBRATION_WIDTH {
            img.put_pixel(x, y, Rgb(row));
        }
    }

    draw_badge(&mut img, quality);

    for _ in 0..CONFETTI_COUNT {
        let x = rng.gen_range(0..CELEBRATION_WIDTH) as i32;
        let y = rng.gen_range(0..CELEBRATION_HEIGHT) as i32;
        let size = rng.gen_range(5..=15);
        let color = [
            rng.gen_range(200..=255),
            rng.gen_range(200..=255),
            rng.gen_range(150..=255),
        ];
        let alpha = rng.gen_range(128..=255);
        if rng.gen_bool(0.5) {
            fill_ellipse(&mut img, x, y, size, size, color, alpha);
        } else {
            fill_rect(&mut img, x, y, size, size, color, alpha);
        }
    }

    img
}

/// Badge centered in the upper half: star, ring or rising bars.
fn draw_badge(img: &mut RgbImage, quality: QualityLabel) {
    let cx = (CELEBRATION_WIDTH / 2) as f32;
    let cy = 130.0;
    match quality {
        QualityLabel::Excellent => {
            let star = star_points(cx, cy, 80.0, 34.0);
            fill_polygon(img, &star, WHITE, 220);
        }
        QualityLabel::Good => {
            fill_ring(img, cx, cy, 70.0, 48.0, WHITE, 220);
            let star = star_points(cx, cy, 40.0, 17.0);
            fill_polygon(img, &star, WHITE, 220);
        }
        QualityLabel::Normal => {
            for (i, height) in [50, 85, 120].into_iter().enumerate() {
                let x = cx as i32 - 75 + i as i32 * 55;
                fill_rect(img, x, cy as i32 + 60 - height, 40, height, WHITE, 220);
            }
        }
    }
    // Band under the badge where the page lays the headline.
    fill_rect(img, 100, 240, CELEBRATION_WIDTH as i32 - 200, 70, WHITE, 60);
}

/// Placeholder logo: flat background with a lightning bolt.
pub fn draw_logo_placeholder() -> RgbImage {
    let mut img = RgbImage::from_pixel(LOGO_WIDTH, LOGO_HEIGHT, Rgb(LOGO_BACKGROUND));
    let bolt = [
        (330.0, 40.0),
        (240.0, 165.0),
        (295.0, 165.0),
        (260.0, 265.0),
        (370.0, 125.0),
        (312.0, 125.0),
        (350.0, 40.0),
    ];
    fill_polygon(&mut img, &bolt, LOGO_ACCENT, 255);
    img
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t) as u8
}

fn blend(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3], alpha: u8) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let a = alpha as u32;
    let px = img.get_pixel_mut(x as u32, y as u32);
    for (channel, c) in px.0.iter_mut().zip(color) {
        *channel = ((c as u32 * a + *channel as u32 * (255 - a)) / 255) as u8;
    }
}

fn fill_rect(img: &mut RgbImage, x: i32, y: i32, w: i32, h: i32, color: [u8; 3], alpha: u8) {
    for py in y..y + h {
        for px in x..x + w {
            blend(img, px, py, color, alpha);
        }
    }
}

fn fill_ellipse(img: &mut RgbImage, x: i32, y: i32, w: i32, h: i32, color: [u8; 3], alpha: u8) {
    let rx = w as f32 / 2.0;
    let ry = h as f32 / 2.0;
    let cx = x as f32 + rx;
    let cy = y as f32 + ry;
    for py in y..y + h {
        for px in x..x + w {
            let dx = (px as f32 + 0.5 - cx) / rx;
            let dy = (py as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                blend(img, px, py, color, alpha);
            }
        }
    }
}

fn fill_ring(img: &mut RgbImage, cx: f32, cy: f32, outer: f32, inner: f32, color: [u8; 3], alpha: u8) {
    let (x0, x1) = ((cx - outer) as i32, (cx + outer) as i32);
    let (y0, y1) = ((cy - outer) as i32, (cy + outer) as i32);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d <= outer && d >= inner {
                blend(img, px, py, color, alpha);
            }
        }
    }
}

fn star_points(cx: f32, cy: f32, outer: f32, inner: f32) -> Vec<(f32, f32)> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect()
}

/// Even-odd fill, sampled at pixel centers.
fn fill_polygon(img: &mut RgbImage, points: &[(f32, f32)], color: [u8; 3], alpha: u8) {
    if points.len() < 3 {
        return;
    }
    let min_x = points.iter().map(|p| p.0).fold(f32::MAX, f32::min).floor() as i32;
    let max_x = points.iter().map(|p| p.0).fold(f32::MIN, f32::max).ceil() as i32;
    let min_y = points.iter().map(|p| p.1).fold(f32::MAX, f32::min).floor() as i32;
    let max_y = points.iter().map(|p| p.1).fold(f32::MIN, f32::max).ceil() as i32;

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            if contains(points, px as f32 + 0.5, py as f32 + 0.5) {
                blend(img, px, py, color, alpha);
            }
        }
    }
}

fn contains(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
