//! Pixel enumeration for the concrete canvases.
//!
//! Both the PNG canvas and the terminal braille canvas rasterize through
//! these helpers; they only differ in what a "pixel" is and how it is
//! stored. Pixel centers sit on integer coordinates.

/// Clip rectangle `[x1, x2] × [y1, y2]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ClipBox {
    /// Box covering a `width × height` grid, grown by `margin` on each side.
    pub fn for_grid(width: u32, height: u32, margin: f64) -> Self {
        Self {
            x1: -margin,
            y1: -margin,
            x2: width as f64 - 1.0 + margin,
            y2: height as f64 - 1.0 + margin,
        }
    }
}

/// Clip a segment against `clip` (Liang-Barsky).
///
/// Returns the visible part, or `None` when the segment misses the box.
pub fn clip_segment(
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    clip: &ClipBox,
) -> Option<((f64, f64), (f64, f64))> {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-dx, x1 - clip.x1),
        (dx, clip.x2 - x1),
        (-dy, y1 - clip.y1),
        (dy, clip.y2 - y1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (x1 + t0 * dx, y1 + t0 * dy),
        (x1 + t1 * dx, y1 + t1 * dy),
    ))
}

/// Visit every pixel of a filled axis-aligned ellipse, limited to `clip`.
///
/// Radii under half a pixel still mark the nearest pixel so tiny dots stay
/// visible.
pub fn fill_ellipse(
    (cx, cy): (f64, f64),
    (rx, ry): (f64, f64),
    clip: &ClipBox,
    mut plot: impl FnMut(i32, i32),
) {
    if !(cx.is_finite() && cy.is_finite() && rx.is_finite() && ry.is_finite()) {
        return;
    }
    let (rx, ry) = (rx.abs(), ry.abs());

    if rx < 0.5 || ry < 0.5 {
        let (x, y) = (cx.round(), cy.round());
        if x >= clip.x1 && x <= clip.x2 && y >= clip.y1 && y <= clip.y2 {
            plot(x as i32, y as i32);
        }
        return;
    }

    let y_lo = (cy - ry).ceil().max(clip.y1.ceil());
    let y_hi = (cy + ry).floor().min(clip.y2.floor());
    if y_lo > y_hi {
        return;
    }
    for y in y_lo as i32..=y_hi as i32 {
        let dy = (y as f64 - cy) / ry;
        let half = rx * (1.0 - dy * dy).max(0.0).sqrt();
        let x_lo = (cx - half).ceil().max(clip.x1.ceil());
        let x_hi = (cx + half).floor().min(clip.x2.floor());
        if x_lo > x_hi {
            continue;
        }
        for x in x_lo as i32..=x_hi as i32 {
            plot(x, y);
        }
    }
}

/// Visit the pixels of a stroked segment.
///
/// A DDA walk over the clipped segment; when the stroke is wider than a
/// pixel each step stamps an ellipse with the given half-widths.
pub fn stroke_segment(
    from: (f64, f64),
    to: (f64, f64),
    (hx, hy): (f64, f64),
    clip: &ClipBox,
    mut plot: impl FnMut(i32, i32),
) {
    if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
        return;
    }
    let grown = ClipBox {
        x1: clip.x1 - hx,
        y1: clip.y1 - hy,
        x2: clip.x2 + hx,
        y2: clip.y2 + hy,
    };
    let Some(((x1, y1), (x2, y2))) = clip_segment(from, to, &grown) else {
        return;
    };

    let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as u32;
    let thin = hx < 0.75 && hy < 0.75;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = x1 + (x2 - x1) * t;
        let y = y1 + (y2 - y1) * t;
        if thin {
            let (px, py) = (x.round(), y.round());
            if px >= clip.x1 && px <= clip.x2 && py >= clip.y1 && py <= clip.y2 {
                plot(px as i32, py as i32);
            }
        } else {
            fill_ellipse((x, y), (hx, hy), clip, &mut plot);
        }
    }
}
