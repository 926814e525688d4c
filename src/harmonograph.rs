//! Four-pendulum harmonograph.
//!
//! Pendulums 1 and 2 swing along x, 3 and 4 along y. Each contributes a
//! damped sinusoid; the pen follows their sum from t = 0 to t = 100 in
//! steps of 0.01, drawing one segment per step.

use crate::canvas::{Canvas, Color, Size};
use crate::colormap::Colormap;
use crate::config::{HarmonographOverrides, PendulumOverride};
use crate::error::{check_range, Error, Result};
use crate::model::{Model, Progress, Randomize};
use rand::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, info};

/// Last tick of a run; t = tick * `TIME_STEP`.
///
/// Ticks 0..=TICKS are inclusive: 10,001 samples and 10,000 segments. The
/// clock is an integer so the t > 100 bound is exact.
pub const TICKS: u32 = 10_000;
pub const TIME_STEP: f64 = 0.01;

pub const PENDULUMS: usize = 4;

/// One pendulum, in control units.
///
/// Frequency is "Hz-like" (scaled by 2/π), phase is in degrees and decay
/// runs 0-100 where larger damps faster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pendulum {
    pub enabled: bool,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub decay: f64,
}

impl Pendulum {
    const fn new(enabled: bool, amplitude: f64, frequency: f64) -> Self {
        Self {
            enabled,
            amplitude,
            frequency,
            phase: 0.0,
            decay: 5.0,
        }
    }

    pub fn angular_frequency(&self) -> f64 {
        self.frequency * 2.0 / PI
    }

    pub fn phase_radians(&self) -> f64 {
        self.phase * PI / 180.0
    }

    /// Exponent rate, always <= 0
    pub fn decay_rate(&self) -> f64 {
        self.decay / -200.0
    }

    /// Displacement at time `t` along this pendulum's axis.
    fn displacement(&self, t: f64, wave: fn(f64) -> f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        let envelope = (self.decay_rate() * t).exp();
        self.amplitude * envelope * wave(t * self.angular_frequency() + self.phase_radians())
    }
}

const DEFAULT_PENDULUMS: [Pendulum; PENDULUMS] = [
    Pendulum::new(true, 300.0, 2.0),
    Pendulum::new(false, 150.0, 4.0),
    Pendulum::new(true, 300.0, 2.0),
    Pendulum::new(false, 150.0, 4.0),
];

const DEFAULT_PEN_SIZE: f64 = 5.0;

/// Colormap position at parametric time `depth`.
///
/// The fractional part of `depth / 100`, reflected when the integer part is
/// odd, so the colormap is walked forward then backward.
pub fn color_position(depth: f64) -> f64 {
    let val = depth / 100.0;
    let frac = val.fract();
    if (val.trunc() as i64) % 2 == 1 {
        1.0 - frac
    } else {
        frac
    }
}

/// The harmonograph model
pub struct Harmonograph {
    canvas: Size,
    origin: (f64, f64),
    pendulums: [Pendulum; PENDULUMS],
    pen_size: f64,
    colormap: Colormap,
    tick: u32,
    last: Option<(f64, f64)>,
}

impl Harmonograph {
    pub fn new(canvas: Size) -> Self {
        Self {
            canvas,
            origin: ((canvas.width / 2.0).floor(), (canvas.height / 2.0).floor()),
            pendulums: DEFAULT_PENDULUMS,
            pen_size: DEFAULT_PEN_SIZE,
            colormap: Colormap::default(),
            tick: 0,
            last: None,
        }
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn pendulums(&self) -> &[Pendulum; PENDULUMS] {
        &self.pendulums
    }

    pub fn pen_size(&self) -> f64 {
        self.pen_size
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    /// Current parametric time.
    pub fn time(&self) -> f64 {
        self.tick as f64 * TIME_STEP
    }

    /// Rewind the clock to t = 0, keeping every parameter.
    pub fn restart(&mut self) {
        self.tick = 0;
        self.last = None;
    }

    /// Pen position at time `t`, clamped to the canvas.
    pub fn pos(&self, t: f64) -> (f64, f64) {
        let [p1, p2, p3, p4] = &self.pendulums;
        let x = self.origin.0 + p1.displacement(t, f64::cos) + p2.displacement(t, f64::cos);
        let y = self.origin.1 + p3.displacement(t, f64::sin) + p4.displacement(t, f64::sin);
        (x.clamp(0.0, self.canvas.width), y.clamp(0.0, self.canvas.height))
    }

    pub fn color_at(&self, depth: f64) -> Color {
        self.colormap.sample(color_position(depth))
    }

    fn pendulum_mut(&mut self, index: usize) -> Result<&mut Pendulum> {
        self.pendulums
            .get_mut(index)
            .ok_or(Error::NoSuchPendulum(index))
    }

    pub fn set_colormap(&mut self, name: &str) -> Result<()> {
        self.colormap = Colormap::by_name(name)?;
        Ok(())
    }

    pub fn set_pen_size(&mut self, size: f64) -> Result<()> {
        self.pen_size = check_range("pen_size", size, 1.0, 100.0, "1-100")?;
        Ok(())
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.pendulum_mut(index)?.enabled = enabled;
        Ok(())
    }

    pub fn set_amplitude(&mut self, index: usize, amplitude: f64) -> Result<()> {
        let amplitude = check_range("amplitude", amplitude, 0.0, 1000.0, "0-1000")?;
        self.pendulum_mut(index)?.amplitude = amplitude;
        Ok(())
    }

    pub fn set_frequency(&mut self, index: usize, frequency: f64) -> Result<()> {
        let frequency = check_range("frequency", frequency, 0.0, 40.0, "0-40")?;
        self.pendulum_mut(index)?.frequency = frequency;
        Ok(())
    }

    pub fn set_phase(&mut self, index: usize, degrees: f64) -> Result<()> {
        let degrees = check_range("phase", degrees, 0.0, 360.0, "0-360")?;
        self.pendulum_mut(index)?.phase = degrees;
        Ok(())
    }

    pub fn set_decay(&mut self, index: usize, decay: f64) -> Result<()> {
        let decay = check_range("decay", decay, 0.0, 100.0, "0-100")?;
        self.pendulum_mut(index)?.decay = decay;
        Ok(())
    }

    /// Apply every present override; pendulums are numbered 1-4 here.
    ///
    /// All-or-nothing, like `BranchTree::apply`.
    pub fn apply(&mut self, o: &HarmonographOverrides) -> Result<()> {
        let saved = (self.pendulums, self.pen_size, self.colormap);
        let result = self.apply_inner(o);
        if result.is_err() {
            (self.pendulums, self.pen_size, self.colormap) = saved;
        }
        result
    }

    fn apply_inner(&mut self, o: &HarmonographOverrides) -> Result<()> {
        if let Some(name) = &o.colormap {
            self.set_colormap(name)?;
        }
        if let Some(size) = o.pen_size {
            self.set_pen_size(size)?;
        }
        for p in &o.pendulums {
            self.apply_pendulum(p)?;
        }
        Ok(())
    }

    fn apply_pendulum(&mut self, p: &PendulumOverride) -> Result<()> {
        if !(1..=PENDULUMS).contains(&p.index) {
            return Err(Error::InvalidParameter {
                name: "pendulum",
                value: p.index as f64,
                expected: "1-4",
            });
        }
        let i = p.index - 1;
        if let Some(on) = p.enabled {
            self.set_enabled(i, on)?;
        }
        if let Some(v) = p.amplitude {
            self.set_amplitude(i, v)?;
        }
        if let Some(v) = p.frequency {
            self.set_frequency(i, v)?;
        }
        if let Some(v) = p.phase {
            self.set_phase(i, v)?;
        }
        if let Some(v) = p.decay {
            self.set_decay(i, v)?;
        }
        Ok(())
    }

    /// Current parameters as a complete override set.
    pub fn overrides(&self) -> HarmonographOverrides {
        HarmonographOverrides {
            colormap: Some(self.colormap.name().to_string()),
            pen_size: Some(self.pen_size),
            pendulums: self
                .pendulums
                .iter()
                .enumerate()
                .map(|(i, p)| PendulumOverride {
                    index: i + 1,
                    enabled: Some(p.enabled),
                    amplitude: Some(p.amplitude),
                    frequency: Some(p.frequency),
                    phase: Some(p.phase),
                    decay: Some(p.decay),
                })
                .collect(),
        }
    }
}

impl Model for Harmonograph {
    fn name(&self) -> &'static str {
        "harmonograph"
    }

    fn reset(&mut self) {
        self.pendulums = DEFAULT_PENDULUMS;
        self.pen_size = DEFAULT_PEN_SIZE;
        self.colormap = Colormap::default();
    }

    fn begin(&mut self) {
        self.restart();
        debug!(pendulums = ?self.pendulums, pen = self.pen_size, "harmonograph run started");
    }

    /// Samples the next tick; every sample after the first draws a segment
    /// from the previous position.
    fn step(&mut self, canvas: &mut dyn Canvas, _rng: &mut StdRng) -> Result<Progress> {
        if self.tick > TICKS {
            return Ok(Progress::Finished);
        }

        let t = self.time();
        let here = self.pos(t);
        if let Some((x, y)) = self.last {
            canvas.draw_line(x, y, here.0, here.1, self.color_at(t), self.pen_size);
            canvas.present()?;
        }
        self.last = Some(here);
        self.tick += 1;

        if self.tick > TICKS {
            info!(segments = TICKS, end = ?here, "harmonograph run finished");
        }
        Ok(Progress::Working)
    }

    fn as_randomize(&mut self) -> Option<&mut dyn Randomize> {
        Some(self)
    }
}

impl Randomize for Harmonograph {
    /// New integer control values for every pendulum; on/off switches and
    /// pen settings are left alone.
    fn randomize(&mut self, rng: &mut StdRng) {
        for p in self.pendulums.iter_mut() {
            p.amplitude = rng.gen_range(0..=1000) as f64;
            p.frequency = rng.gen_range(0..=40) as f64;
            p.phase = rng.gen_range(0..=360) as f64;
            p.decay = rng.gen_range(0..=100) as f64;
        }
        debug!(pendulums = ?self.pendulums, "harmonograph parameters randomized");
    }
}
