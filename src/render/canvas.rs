use std::io::Cursor;

use image::{Rgb, RgbImage};

use crate::error::{OrnagenError, Result};
use crate::models::ImagePayload;

/// Minimal raster surface with the 2D primitives the motif routines need.
/// Everything is computed per pixel with f32 coordinates, so output is
/// deterministic for identical inputs.
pub struct Canvas {
    image: RgbImage,
}

pub fn rgb(hex: u32) -> Rgb<u8> {
    Rgb([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8])
}

fn lerp(a: Rgb<u8>, b: Rgb<u8>, t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgb([
        channel(a.0[0], b.0[0]),
        channel(a.0[1], b.0[1]),
        channel(a.0[2], b.0[2]),
    ])
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Diagonal two-stop gradient from the top-left corner to the
    /// bottom-right corner.
    pub fn fill_linear_gradient(&mut self, from: Rgb<u8>, to: Rgb<u8>) {
        let span = (self.image.width() + self.image.height()).saturating_sub(2).max(1) as f32;
        for y in 0..self.image.height() {
            for x in 0..self.image.width() {
                let t = (x + y) as f32 / span;
                self.image.put_pixel(x, y, lerp(from, to, t));
            }
        }
    }

    fn paint<F>(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, mut inside: F)
    where
        F: FnMut(f32, f32) -> Option<Rgb<u8>>,
    {
        let width = self.image.width() as i64;
        let height = self.image.height() as i64;
        let x_start = (x0.floor() as i64).max(0);
        let x_end = (x1.ceil() as i64).min(width - 1);
        let y_start = (y0.floor() as i64).max(0);
        let y_end = (y1.ceil() as i64).min(height - 1);

        for py in y_start..=y_end {
            for px in x_start..=x_end {
                // Sample at the pixel center.
                let sx = px as f32 + 0.5;
                let sy = py as f32 + 0.5;
                if let Some(color) = inside(sx, sy) {
                    self.image.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
        self.paint(x, y, x + w, y + h, |sx, sy| {
            (sx >= x && sx < x + w && sy >= y && sy < y + h).then_some(color)
        });
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb<u8>) {
        self.paint(cx - r, cy - r, cx + r, cy + r, |sx, sy| {
            let (dx, dy) = (sx - cx, sy - cy);
            (dx * dx + dy * dy <= r * r).then_some(color)
        });
    }

    /// Translucent disk, blended over whatever is already on the surface.
    pub fn fill_circle_alpha(&mut self, cx: f32, cy: f32, r: f32, color: Rgb<u8>, alpha: f32) {
        let width = self.image.width() as i64;
        let height = self.image.height() as i64;
        let x_start = ((cx - r).floor() as i64).max(0);
        let x_end = ((cx + r).ceil() as i64).min(width - 1);
        let y_start = ((cy - r).floor() as i64).max(0);
        let y_end = ((cy + r).ceil() as i64).min(height - 1);

        for py in y_start..=y_end {
            for px in x_start..=x_end {
                let (dx, dy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                if dx * dx + dy * dy <= r * r {
                    let existing = *self.image.get_pixel(px as u32, py as u32);
                    self.image
                        .put_pixel(px as u32, py as u32, lerp(existing, color, alpha));
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, thickness: f32, color: Rgb<u8>) {
        let half = thickness / 2.0;
        let outer = r + half;
        self.paint(cx - outer, cy - outer, cx + outer, cy + outer, |sx, sy| {
            let (dx, dy) = (sx - cx, sy - cy);
            let dist = (dx * dx + dy * dy).sqrt();
            ((dist - r).abs() <= half).then_some(color)
        });
    }

    /// Half-ring: the upper (`top = true`) or lower half of a stroked circle.
    pub fn stroke_semicircle(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        thickness: f32,
        top: bool,
        color: Rgb<u8>,
    ) {
        let half = thickness / 2.0;
        let outer = r + half;
        self.paint(cx - outer, cy - outer, cx + outer, cy + outer, |sx, sy| {
            let (dx, dy) = (sx - cx, sy - cy);
            if top && dy > 0.0 || !top && dy < 0.0 {
                return None;
            }
            let dist = (dx * dx + dy * dy).sqrt();
            ((dist - r).abs() <= half).then_some(color)
        });
    }

    /// Filled half-disk, upper or lower.
    pub fn fill_semicircle(&mut self, cx: f32, cy: f32, r: f32, top: bool, color: Rgb<u8>) {
        self.paint(cx - r, cy - r, cx + r, cy + r, |sx, sy| {
            let (dx, dy) = (sx - cx, sy - cy);
            if top && dy > 0.0 || !top && dy < 0.0 {
                return None;
            }
            (dx * dx + dy * dy <= r * r).then_some(color)
        });
    }

    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgb<u8>) {
        self.paint(cx - rx, cy - ry, cx + rx, cy + ry, |sx, sy| {
            let (dx, dy) = ((sx - cx) / rx, (sy - cy) / ry);
            (dx * dx + dy * dy <= 1.0).then_some(color)
        });
    }

    /// Even-odd filled polygon.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb<u8>) {
        if points.len() < 3 {
            return;
        }
        let x0 = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let x1 = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let y0 = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let y1 = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

        self.paint(x0, y0, x1, y1, |sx, sy| {
            let mut inside = false;
            let mut j = points.len() - 1;
            for i in 0..points.len() {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                if (yi > sy) != (yj > sy) && sx < (xj - xi) * (sy - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
            inside.then_some(color)
        });
    }

    pub fn fill_triangle(
        &mut self,
        a: (f32, f32),
        b: (f32, f32),
        c: (f32, f32),
        color: Rgb<u8>,
    ) {
        self.fill_polygon(&[a, b, c], color);
    }

    /// Line segment with round caps.
    pub fn stroke_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Rgb<u8>,
    ) {
        let half = thickness / 2.0;
        let x0 = x1.min(x2) - half;
        let y0 = y1.min(y2) - half;
        let xe = x1.max(x2) + half;
        let ye = y1.max(y2) + half;
        let (vx, vy) = (x2 - x1, y2 - y1);
        let len_sq = vx * vx + vy * vy;

        self.paint(x0, y0, xe, ye, |sx, sy| {
            let t = if len_sq == 0.0 {
                0.0
            } else {
                (((sx - x1) * vx + (sy - y1) * vy) / len_sq).clamp(0.0, 1.0)
            };
            let (dx, dy) = (sx - (x1 + t * vx), sy - (y1 + t * vy));
            (dx * dx + dy * dy <= half * half).then_some(color)
        });
    }

    /// Disk shaded by distance from a focal point, approximating a radial
    /// gradient with an off-center highlight.
    pub fn fill_radial_circle(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        focal: (f32, f32),
        inner: Rgb<u8>,
        outer: Rgb<u8>,
    ) {
        let reach = r + ((focal.0 - cx).powi(2) + (focal.1 - cy).powi(2)).sqrt();
        self.paint(cx - r, cy - r, cx + r, cy + r, |sx, sy| {
            let (dx, dy) = (sx - cx, sy - cy);
            if dx * dx + dy * dy > r * r {
                return None;
            }
            let (fx, fy) = (sx - focal.0, sy - focal.1);
            let t = (fx * fx + fy * fy).sqrt() / reach;
            Some(lerp(inner, outer, t))
        });
    }

    pub fn into_png_payload(self) -> Result<ImagePayload> {
        let mut cursor = Cursor::new(Vec::new());
        self.image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| OrnagenError::InternalError(format!("PNG encoding failed: {}", e)))?;
        Ok(ImagePayload::png(cursor.into_inner()))
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_hits_both_stops() {
        let mut canvas = Canvas::new(16, 16);
        canvas.fill_linear_gradient(rgb(0x000000), rgb(0xffffff));
        assert_eq!(canvas.pixel(0, 0), rgb(0x000000));
        assert_eq!(canvas.pixel(15, 15), rgb(0xffffff));
    }

    #[test]
    fn fill_circle_stays_inside_radius() {
        let mut canvas = Canvas::new(21, 21);
        canvas.fill_circle(10.0, 10.0, 5.0, rgb(0xff0000));
        assert_eq!(canvas.pixel(10, 10), rgb(0xff0000));
        assert_eq!(canvas.pixel(0, 0), rgb(0x000000));
    }

    #[test]
    fn polygon_fill_covers_centroid() {
        let mut canvas = Canvas::new(32, 32);
        canvas.fill_triangle((16.0, 4.0), (4.0, 28.0), (28.0, 28.0), rgb(0x00ff00));
        assert_eq!(canvas.pixel(16, 20), rgb(0x00ff00));
        assert_eq!(canvas.pixel(1, 1), rgb(0x000000));
    }

    #[test]
    fn png_payload_has_png_signature() {
        let canvas = Canvas::new(4, 4);
        let payload = canvas.into_png_payload().unwrap();
        assert_eq!(&payload.bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(payload.mime, "image/png");
    }
}
