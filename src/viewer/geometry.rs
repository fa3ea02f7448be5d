//! Pure geometry for the viewer's zoom transition.
//!
//! Everything here is side-effect free: the transition driver and the tests
//! share the same frame math.

/// An axis-aligned rectangle in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectf {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectf {
    pub const ZERO: Rectf = Rectf {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// How an image is scaled into a bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Scale so the whole image is visible inside the bounds.
    AspectFit,
    /// Scale so the image covers the bounds, cropping the overflow.
    AspectFill,
}

/// Computes the centered frame for an image of intrinsic size
/// `image_w` x `image_h` scaled into `bounds` per `mode`.
///
/// The result keeps the image's aspect ratio and is centered on both axes.
/// Degenerate inputs (non-positive sizes) fall back to `bounds`.
pub fn centered_frame(image_w: f64, image_h: f64, bounds: Rectf, mode: ContentMode) -> Rectf {
    if image_w <= 0.0 || image_h <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return bounds;
    }

    let scale_x = bounds.width / image_w;
    let scale_y = bounds.height / image_h;
    let scale = match mode {
        ContentMode::AspectFit => scale_x.min(scale_y),
        ContentMode::AspectFill => scale_x.max(scale_y),
    };

    let width = image_w * scale;
    let height = image_h * scale;
    Rectf::new(
        bounds.x + (bounds.width - width) / 2.0,
        bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    )
}

/// Linear interpolation between two scalars at `t` in [0, 1].
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Linear interpolation between two rectangles at `t` in [0, 1].
pub fn lerp_rect(from: Rectf, to: Rectf, t: f64) -> Rectf {
    Rectf::new(
        lerp(from.x, to.x, t),
        lerp(from.y, to.y, t),
        lerp(from.width, to.width, t),
        lerp(from.height, to.height, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rectf = Rectf {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    fn aspect(rect: Rectf) -> f64 {
        rect.width / rect.height
    }

    #[test]
    fn fit_keeps_image_inside_bounds() {
        let frame = centered_frame(4000.0, 1000.0, BOUNDS, ContentMode::AspectFit);
        assert!(frame.width <= BOUNDS.width + 1e-9);
        assert!(frame.height <= BOUNDS.height + 1e-9);
        assert!((aspect(frame) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn fill_covers_bounds() {
        let frame = centered_frame(4000.0, 1000.0, BOUNDS, ContentMode::AspectFill);
        assert!(frame.width >= BOUNDS.width - 1e-9);
        assert!(frame.height >= BOUNDS.height - 1e-9);
        assert!((aspect(frame) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn result_is_centered_on_both_axes() {
        for mode in [ContentMode::AspectFit, ContentMode::AspectFill] {
            let frame = centered_frame(300.0, 500.0, BOUNDS, mode);
            let (cx, cy) = frame.center();
            let (bx, by) = BOUNDS.center();
            assert!((cx - bx).abs() < 1e-9);
            assert!((cy - by).abs() < 1e-9);
        }
    }

    #[test]
    fn centered_frame_is_deterministic() {
        let a = centered_frame(1234.0, 567.0, BOUNDS, ContentMode::AspectFill);
        let b = centered_frame(1234.0, 567.0, BOUNDS, ContentMode::AspectFill);
        assert_eq!(a, b);
    }

    #[test]
    fn offset_bounds_are_respected() {
        let bounds = Rectf::new(100.0, 50.0, 400.0, 400.0);
        let frame = centered_frame(200.0, 200.0, bounds, ContentMode::AspectFit);
        assert_eq!(frame, Rectf::new(100.0, 50.0, 400.0, 400.0));
    }

    #[test]
    fn degenerate_input_falls_back_to_bounds() {
        assert_eq!(
            centered_frame(0.0, 100.0, BOUNDS, ContentMode::AspectFit),
            BOUNDS
        );
    }

    #[test]
    fn lerp_rect_hits_endpoints() {
        let from = Rectf::new(10.0, 20.0, 30.0, 40.0);
        let to = Rectf::new(110.0, 120.0, 130.0, 140.0);
        assert_eq!(lerp_rect(from, to, 0.0), from);
        assert_eq!(lerp_rect(from, to, 1.0), to);
        let mid = lerp_rect(from, to, 0.5);
        assert_eq!(mid, Rectf::new(60.0, 70.0, 80.0, 90.0));
    }
}
