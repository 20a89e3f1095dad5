/// Software 2D surface that executes `DrawCmd`s.
///
/// One pixel per board pixel. A pixel is painted when its center falls
/// inside the shape; translucent colors are alpha-blended over what is
/// already there. The terminal renderer reads the result back through
/// `average()` at a much coarser resolution.

use super::draw::{DrawCmd, Rgba};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<Rgba> for Rgb {
    fn from(c: Rgba) -> Self {
        Rgb { r: c.r, g: c.g, b: c.b }
    }
}

pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, pixels: vec![Rgb::default(); width * height] }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Rgb::default()
        }
    }

    pub fn execute(&mut self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            match *cmd {
                DrawCmd::FillRect { x, y, w, h, color } => self.fill_rect(x, y, w, h, color),
                DrawCmd::FillCircle { cx, cy, r, color } => self.fill_circle(cx, cy, r, color),
                DrawCmd::RadialGlow { cx, cy, inner, outer, from, to } => {
                    self.radial_glow(cx, cy, inner, outer, from, to)
                }
            }
        }
    }

    /// Mean color of a pixel block, clipped to the surface.
    pub fn average(&self, x0: usize, y0: usize, w: usize, h: usize) -> Rgb {
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = self.pixels[y * self.width + x];
                r += p.r as u32;
                g += p.g as u32;
                b += p.b as u32;
                n += 1;
            }
        }
        if n == 0 {
            return Rgb::default();
        }
        Rgb { r: (r / n) as u8, g: (g / n) as u8, b: (b / n) as u8 }
    }

    // ── Primitives ──

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (xs, xe) = self.span(x, x + w, self.width);
        let (ys, ye) = self.span(y, y + h, self.height);
        for py in ys..ye {
            for px in xs..xe {
                self.blend(px, py, color);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba) {
        if r <= 0.0 {
            return;
        }
        let (xs, xe) = self.span(cx - r, cx + r, self.width);
        let (ys, ye) = self.span(cy - r, cy + r, self.height);
        let r2 = r * r;
        for py in ys..ye {
            for px in xs..xe {
                if dist2(px, py, cx, cy) <= r2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn radial_glow(&mut self, cx: f32, cy: f32, inner: f32, outer: f32, from: Rgba, to: Rgba) {
        if outer <= 0.0 {
            return;
        }
        let (xs, xe) = self.span(cx - outer, cx + outer, self.width);
        let (ys, ye) = self.span(cy - outer, cy + outer, self.height);
        let band = (outer - inner).max(f32::EPSILON);
        for py in ys..ye {
            for px in xs..xe {
                let d = dist2(px, py, cx, cy).sqrt();
                if d > outer {
                    continue;
                }
                let t = ((d - inner) / band).clamp(0.0, 1.0);
                self.blend(px, py, lerp(from, to, t));
            }
        }
    }

    // ── Internal ──

    /// Pixel index range whose centers fall in `[lo, hi)`.
    fn span(&self, lo: f32, hi: f32, limit: usize) -> (usize, usize) {
        let start = (lo - 0.5).ceil().max(0.0) as usize;
        let end = ((hi - 0.5).ceil().max(0.0) as usize).min(limit);
        (start.min(end), end)
    }

    fn blend(&mut self, x: usize, y: usize, c: Rgba) {
        let a = c.a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[y * self.width + x];
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        *dst = Rgb { r: mix(c.r, dst.r), g: mix(c.g, dst.g), b: mix(c.b, dst.b) };
    }
}

fn dist2(px: usize, py: usize, cx: f32, cy: f32) -> f32 {
    let dx = px as f32 + 0.5 - cx;
    let dy = py as f32 + 0.5 - cy;
    dx * dx + dy * dy
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let ch = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgba { r: ch(a.r, b.r), g: ch(a.g, b.g), b: ch(a.b, b.b), a: a.a + (b.a - a.a) * t }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const GREY: Rgba = Rgba::rgb(100, 100, 100);

    fn grey_canvas(n: usize) -> Canvas {
        let mut c = Canvas::new(n, n);
        c.execute(&[DrawCmd::FillRect { x: 0.0, y: 0.0, w: n as f32, h: n as f32, color: GREY }]);
        c
    }

    #[test]
    fn rect_covers_exact_pixels() {
        let mut c = Canvas::new(10, 10);
        c.execute(&[DrawCmd::FillRect { x: 2.0, y: 3.0, w: 4.0, h: 2.0, color: RED }]);
        assert_eq!(c.pixel(2, 3), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(c.pixel(5, 4), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(c.pixel(6, 4), Rgb::default());
        assert_eq!(c.pixel(2, 5), Rgb::default());
    }

    #[test]
    fn circle_fills_center_not_corners() {
        let mut c = grey_canvas(20);
        c.execute(&[DrawCmd::FillCircle { cx: 10.0, cy: 10.0, r: 9.0, color: RED }]);
        assert_eq!(c.pixel(10, 10), Rgb::from(RED));
        assert_eq!(c.pixel(1, 10), Rgb::from(RED));
        assert_eq!(c.pixel(0, 0), Rgb::from(GREY));
        assert_eq!(c.pixel(19, 19), Rgb::from(GREY));
    }

    #[test]
    fn shapes_clip_at_edges() {
        let mut c = Canvas::new(8, 8);
        c.execute(&[
            DrawCmd::FillCircle { cx: -2.0, cy: 4.0, r: 4.0, color: RED },
            DrawCmd::FillRect { x: 6.0, y: 6.0, w: 50.0, h: 50.0, color: RED },
        ]);
        assert_eq!(c.pixel(0, 4), Rgb::from(RED));
        assert_eq!(c.pixel(7, 7), Rgb::from(RED));
    }

    #[test]
    fn glow_fades_to_nothing() {
        let mut c = grey_canvas(40);
        c.execute(&[DrawCmd::RadialGlow {
            cx: 20.0,
            cy: 20.0,
            inner: 2.0,
            outer: 15.0,
            from: RED.with_alpha(0.8),
            to: RED.with_alpha(0.0),
        }]);
        let center = c.pixel(19, 19);
        assert!(center.r > 200 && center.g < 40, "{center:?}");
        // Outside the outer radius: untouched.
        assert_eq!(c.pixel(0, 0), Rgb::from(GREY));
        // Halfway out it is partially tinted.
        let mid = c.pixel(28, 19);
        assert!(mid.r > 100 && mid.r < center.r, "{mid:?}");
    }

    #[test]
    fn translucent_blends() {
        let mut c = grey_canvas(2);
        c.execute(&[DrawCmd::FillRect { x: 0.0, y: 0.0, w: 2.0, h: 2.0, color: RED.with_alpha(0.5) }]);
        assert_eq!(c.pixel(0, 0), Rgb { r: 178, g: 50, b: 50 });
    }

    #[test]
    fn average_of_block() {
        let mut c = Canvas::new(4, 2);
        c.execute(&[DrawCmd::FillRect { x: 0.0, y: 0.0, w: 2.0, h: 2.0, color: Rgba::rgb(200, 100, 0) }]);
        assert_eq!(c.average(0, 0, 4, 2), Rgb { r: 100, g: 50, b: 0 });
        assert_eq!(c.average(0, 0, 2, 2), Rgb { r: 200, g: 100, b: 0 });
        assert_eq!(c.average(10, 10, 2, 2), Rgb::default());
    }
}
