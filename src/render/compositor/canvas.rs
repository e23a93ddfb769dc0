//! Alpha-blended drawing primitives over an [`RgbaImage`].
//!
//! Boxes are `(x1, y1, x2, y2)` with inclusive corners. Shapes are clipped to
//! the canvas, so callers may pass coordinates that overhang the edges.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use image::{Rgba, RgbaImage};

pub type Rgb = [u8; 3];

/// Inclusive bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Bounds {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(self) -> i32 {
        self.y2 - self.y1
    }

    pub fn center(self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    fn shrink(self, by: i32) -> Self {
        Self::new(self.x1 + by, self.y1 + by, self.x2 - by, self.y2 - by)
    }
}

pub const fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

pub const fn with_alpha(color: Rgb, alpha: u8) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], alpha])
}

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> i32 {
        i32::try_from(self.image.width()).unwrap_or(i32::MAX)
    }

    pub fn height(&self) -> i32 {
        i32::try_from(self.image.height()).unwrap_or(i32::MAX)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Overwrite every row with a colour interpolated from `top` to `bottom`.
    pub fn vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let last_row = f64::from(self.image.height().saturating_sub(1).max(1));
        for (_, y, pixel) in self.image.enumerate_pixels_mut() {
            let ratio = f64::from(y) / last_row;
            let mut rgba = [0u8, 0, 0, 255];
            for channel in 0..3 {
                let mixed =
                    f64::from(top[channel]) * (1.0 - ratio) + f64::from(bottom[channel]) * ratio;
                rgba[channel] = mixed.clamp(0.0, 255.0) as u8;
            }
            *pixel = Rgba(rgba);
        }
    }

    /// Write a pixel as-is, alpha included. Used on transparent overlays.
    fn put(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if let Some((x, y)) = self.index(x, y) {
            self.image.put_pixel(x, y, color);
        }
    }

    /// Source-over blend onto an opaque or translucent destination.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        let Some((x, y)) = self.index(x, y) else {
            return;
        };
        let dst = self.image.get_pixel_mut(x, y);
        let src_a = u32::from(color[3]);
        if src_a == 255 {
            *dst = color;
            return;
        }
        let inv = 255 - src_a;
        for channel in 0..3 {
            let mixed = (u32::from(color[channel]) * src_a + u32::from(dst[channel]) * inv) / 255;
            dst[channel] = mixed as u8;
        }
        dst[3] = (src_a + u32::from(dst[3]) * inv / 255).min(255) as u8;
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.image.width() && y < self.image.height()).then_some((x, y))
    }

    fn paint(&mut self, x: i32, y: i32, color: Rgba<u8>, overwrite: bool) {
        if overwrite {
            self.put(x, y, color);
        } else {
            self.blend(x, y, color);
        }
    }

    /// Visit every on-canvas pixel of `bounds` for which `inside` holds.
    fn fill_where(
        &mut self,
        bounds: Bounds,
        color: Rgba<u8>,
        overwrite: bool,
        inside: impl Fn(i32, i32) -> bool,
    ) {
        let x_start = bounds.x1.max(0);
        let y_start = bounds.y1.max(0);
        let x_end = bounds.x2.min(self.width() - 1);
        let y_end = bounds.y2.min(self.height() - 1);
        for y in y_start..=y_end {
            for x in x_start..=x_end {
                if inside(x, y) {
                    self.paint(x, y, color, overwrite);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, bounds: Bounds, color: Rgba<u8>) {
        self.fill_where(bounds, color, false, |_, _| true);
    }

    pub fn stroke_rect(&mut self, bounds: Bounds, color: Rgba<u8>, width: i32) {
        let inner = bounds.shrink(width.max(1));
        self.fill_where(bounds, color, false, |x, y| {
            x < inner.x1 || x > inner.x2 || y < inner.y1 || y > inner.y2
        });
    }

    pub fn fill_ellipse(&mut self, bounds: Bounds, color: Rgba<u8>) {
        self.fill_where(bounds, color, false, |x, y| in_ellipse(bounds, x, y));
    }

    /// Ellipse written without blending, for building an alpha overlay.
    pub fn put_ellipse(&mut self, bounds: Bounds, color: Rgba<u8>) {
        self.fill_where(bounds, color, true, |x, y| in_ellipse(bounds, x, y));
    }

    pub fn stroke_ellipse(&mut self, bounds: Bounds, color: Rgba<u8>, width: i32) {
        let inner = bounds.shrink(width.max(1));
        self.fill_where(bounds, color, false, |x, y| {
            in_ellipse(bounds, x, y) && !in_ellipse(inner, x, y)
        });
    }

    /// Elliptical arc from `start` to `end` degrees, clockwise from three
    /// o'clock. `end < start` wraps through 0.
    pub fn arc(&mut self, bounds: Bounds, start: f64, end: f64, color: Rgba<u8>, width: i32) {
        let inner = bounds.shrink(width.max(1));
        let (cx, cy) = center_f(bounds);
        let rx = f64::from(bounds.width()).max(1.0) / 2.0;
        let ry = f64::from(bounds.height()).max(1.0) / 2.0;
        self.fill_where(bounds, color, false, |x, y| {
            if !in_ellipse(bounds, x, y) || in_ellipse(inner, x, y) {
                return false;
            }
            let angle = ((f64::from(y) - cy) / ry)
                .atan2((f64::from(x) - cx) / rx)
                .to_degrees()
                .rem_euclid(360.0);
            angle_in_sweep(angle, start, end)
        });
    }

    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba<u8>, width: i32) {
        let half = (f64::from(width.max(1)) / 2.0).max(0.5);
        let reach = half.ceil() as i32;
        let bounds = Bounds::new(
            from.0.min(to.0) - reach,
            from.1.min(to.1) - reach,
            from.0.max(to.0) + reach,
            from.1.max(to.1) + reach,
        );
        self.fill_where(bounds, color, false, |x, y| {
            distance_to_segment((x, y), from, to) <= half
        });
    }

    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgba<u8>) {
        if points.len() < 3 {
            return;
        }
        let bounds = Bounds::new(
            points.iter().map(|p| p.0).min().unwrap_or(0),
            points.iter().map(|p| p.1).min().unwrap_or(0),
            points.iter().map(|p| p.0).max().unwrap_or(0),
            points.iter().map(|p| p.1).max().unwrap_or(0),
        );
        self.fill_where(bounds, color, false, |x, y| {
            in_polygon(points, f64::from(x) + 0.5, f64::from(y) + 0.5)
        });
    }

    pub fn fill_rounded_rect(&mut self, bounds: Bounds, radius: i32, color: Rgba<u8>) {
        self.fill_where(bounds, color, false, |x, y| {
            in_rounded_rect(bounds, radius, x, y)
        });
    }

    pub fn stroke_rounded_rect(&mut self, bounds: Bounds, radius: i32, color: Rgba<u8>, width: i32) {
        let width = width.max(1);
        let inner = bounds.shrink(width);
        let inner_radius = (radius - width).max(0);
        self.fill_where(bounds, color, false, |x, y| {
            in_rounded_rect(bounds, radius, x, y) && !in_rounded_rect(inner, inner_radius, x, y)
        });
    }

    /// Alpha-composite `overlay` (same size) over this canvas.
    pub fn composite(&mut self, overlay: &RgbaImage) {
        for (x, y, pixel) in overlay.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
                self.blend(x, y, *pixel);
            }
        }
    }
}

fn center_f(bounds: Bounds) -> (f64, f64) {
    (
        f64::from(bounds.x1 + bounds.x2) / 2.0,
        f64::from(bounds.y1 + bounds.y2) / 2.0,
    )
}

fn in_ellipse(bounds: Bounds, x: i32, y: i32) -> bool {
    if bounds.x2 < bounds.x1 || bounds.y2 < bounds.y1 {
        return false;
    }
    let (cx, cy) = center_f(bounds);
    let rx = (f64::from(bounds.width()) / 2.0).max(0.5);
    let ry = (f64::from(bounds.height()) / 2.0).max(0.5);
    let dx = (f64::from(x) - cx) / rx;
    let dy = (f64::from(y) - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

fn in_rounded_rect(bounds: Bounds, radius: i32, x: i32, y: i32) -> bool {
    if x < bounds.x1 || x > bounds.x2 || y < bounds.y1 || y > bounds.y2 {
        return false;
    }
    let radius = radius.min(bounds.width() / 2).min(bounds.height() / 2).max(0);
    let corner_x = if x < bounds.x1 + radius {
        Some(bounds.x1 + radius)
    } else if x > bounds.x2 - radius {
        Some(bounds.x2 - radius)
    } else {
        None
    };
    let corner_y = if y < bounds.y1 + radius {
        Some(bounds.y1 + radius)
    } else if y > bounds.y2 - radius {
        Some(bounds.y2 - radius)
    } else {
        None
    };
    match (corner_x, corner_y) {
        (Some(cx), Some(cy)) => {
            let dx = f64::from(x - cx);
            let dy = f64::from(y - cy);
            dx * dx + dy * dy <= f64::from(radius * radius)
        }
        _ => true,
    }
}

fn angle_in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let start = start.rem_euclid(360.0);
    let end = end.rem_euclid(360.0);
    if start <= end {
        (start..=end).contains(&angle)
    } else {
        angle >= start || angle <= end
    }
}

fn distance_to_segment(point: (i32, i32), a: (i32, i32), b: (i32, i32)) -> f64 {
    let (px, py) = (f64::from(point.0), f64::from(point.1));
    let (ax, ay) = (f64::from(a.0), f64::from(a.1));
    let (bx, by) = (f64::from(b.0), f64::from(b.1));
    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (nx, ny) = (ax + t * dx, ay + t * dy);
    ((px - nx).powi(2) + (py - ny).powi(2)).sqrt()
}

/// Even-odd ray casting.
fn in_polygon(points: &[(i32, i32)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (f64::from(points[i].0), f64::from(points[i].1));
        let (xj, yj) = (f64::from(points[j].0), f64::from(points[j].1));
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = [220, 40, 40];

    fn blank(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        canvas.vertical_gradient([0, 0, 0], [0, 0, 0]);
        canvas
    }

    fn pixel(canvas: &Canvas, x: u32, y: u32) -> [u8; 4] {
        canvas.image().get_pixel(x, y).0
    }

    #[test]
    fn gradient_runs_top_to_bottom() {
        let mut canvas = Canvas::new(4, 11);
        canvas.vertical_gradient([0, 0, 0], [200, 100, 50]);
        assert_eq!(pixel(&canvas, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 3, 10), [200, 100, 50, 255]);
        assert_eq!(pixel(&canvas, 2, 5), [100, 50, 25, 255]);
    }

    #[test]
    fn shapes_are_clipped_to_the_canvas() {
        let mut canvas = blank(10, 10);
        canvas.fill_ellipse(Bounds::new(-20, -20, 40, 40), opaque(RED));
        canvas.line((-5, -5), (50, 50), opaque(RED), 6);
        canvas.fill_polygon(&[(-10, 0), (30, 0), (0, 30)], opaque(RED));
        assert_eq!(pixel(&canvas, 5, 5), [220, 40, 40, 255]);
    }

    #[test]
    fn ellipse_leaves_corners_untouched() {
        let mut canvas = blank(21, 21);
        canvas.fill_ellipse(Bounds::new(0, 0, 20, 20), opaque(RED));
        assert_eq!(pixel(&canvas, 10, 10), [220, 40, 40, 255]);
        assert_eq!(pixel(&canvas, 0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn stroke_ellipse_is_hollow() {
        let mut canvas = blank(41, 41);
        canvas.stroke_ellipse(Bounds::new(0, 0, 40, 40), opaque(RED), 3);
        assert_eq!(pixel(&canvas, 20, 20), [0, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 20, 1), [220, 40, 40, 255]);
    }

    #[test]
    fn bottom_arc_skips_the_top_half() {
        let mut canvas = blank(41, 41);
        canvas.arc(Bounds::new(0, 0, 40, 40), 0.0, 180.0, opaque(RED), 4);
        assert_eq!(pixel(&canvas, 20, 39), [220, 40, 40, 255]);
        assert_eq!(pixel(&canvas, 20, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn wrapping_arc_covers_the_top() {
        let mut canvas = blank(41, 41);
        canvas.arc(Bounds::new(0, 0, 40, 40), 200.0, 20.0, opaque(RED), 4);
        assert_eq!(pixel(&canvas, 20, 1), [220, 40, 40, 255]);
        assert_eq!(pixel(&canvas, 20, 39), [0, 0, 0, 255]);
    }

    #[test]
    fn translucent_fill_blends() {
        let mut canvas = blank(4, 4);
        canvas.fill_rect(Bounds::new(0, 0, 3, 3), with_alpha([255, 255, 255], 128));
        let [r, g, b, a] = pixel(&canvas, 1, 1);
        assert_eq!(a, 255);
        assert!((127..=129).contains(&r) && r == g && g == b);
    }

    #[test]
    fn rounded_rect_trims_corners() {
        let mut canvas = blank(50, 30);
        canvas.fill_rounded_rect(Bounds::new(0, 0, 49, 29), 10, opaque(RED));
        assert_eq!(pixel(&canvas, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 25, 0), [220, 40, 40, 255]);
        assert_eq!(pixel(&canvas, 0, 15), [220, 40, 40, 255]);
    }

    #[test]
    fn triangle_fill_covers_its_interior() {
        let mut canvas = blank(20, 20);
        canvas.fill_polygon(&[(0, 0), (19, 0), (0, 19)], opaque(RED));
        assert_eq!(pixel(&canvas, 2, 2), [220, 40, 40, 255]);
        assert_eq!(pixel(&canvas, 18, 18), [0, 0, 0, 255]);
    }

    #[test]
    fn overlay_composites_over_base() {
        let mut canvas = blank(2, 1);
        let mut overlay = RgbaImage::new(2, 1);
        overlay.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        canvas.composite(&overlay);
        assert_eq!(pixel(&canvas, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 1, 0), [255, 0, 0, 255]);
    }
}
