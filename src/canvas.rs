//! Drawing surfaces the models paint on.
//!
//! Models only ever talk to `dyn Canvas`; the concrete surface (PNG buffer,
//! terminal preview, recorder) is chosen by the host.

use crate::error::Result;
use crate::raster::{self, ClipBox};
use image::RgbImage;
use std::path::Path;

/// 8-bit sRGB color
pub type Color = image::Rgb<u8>;

/// Abstract 2D raster surface with a fixed size
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Paint the whole surface with `color`.
    fn fill(&mut self, color: Color);

    /// Stroke a segment `stroke_width` pixels wide.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, stroke_width: f64);

    /// Filled disc of `radius` around (cx, cy).
    fn draw_ellipse(&mut self, cx: f64, cy: f64, radius: f64, color: Color);

    /// Make drawn content visible. Advisory; headless surfaces do nothing.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Canvas dimensions, captured by models at construction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn of(canvas: &dyn Canvas) -> Self {
        Self::new(canvas.width(), canvas.height())
    }
}

/// In-memory RGB image, saved as PNG
pub struct RasterCanvas {
    image: RgbImage,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn clip(&self) -> ClipBox {
        ClipBox::for_grid(self.image.width(), self.image.height(), 0.0)
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill(&mut self, color: Color) {
        for px in self.image.pixels_mut() {
            *px = color;
        }
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, stroke_width: f64) {
        let half = stroke_width.max(1.0) / 2.0;
        let clip = self.clip();
        let image = &mut self.image;
        raster::stroke_segment((x1, y1), (x2, y2), (half, half), &clip, |x, y| {
            image.put_pixel(x as u32, y as u32, color);
        });
    }

    fn draw_ellipse(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let clip = self.clip();
        let image = &mut self.image;
        raster::fill_ellipse((cx, cy), (radius, radius), &clip, |x, y| {
            image.put_pixel(x as u32, y as u32, color);
        });
    }
}

/// One recorded canvas call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill(Color),
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        width: f64,
    },
    Ellipse {
        center: (f64, f64),
        radius: f64,
        color: Color,
    },
    Present,
}

/// Canvas that records every call instead of rasterizing
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn ellipses(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Ellipse { .. }))
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill(&mut self, color: Color) {
        self.ops.push(DrawOp::Fill(color));
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, stroke_width: f64) {
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
            color,
            width: stroke_width,
        });
    }

    fn draw_ellipse(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.ops.push(DrawOp::Ellipse {
            center: (cx, cy),
            radius,
            color,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Present);
        Ok(())
    }
}
