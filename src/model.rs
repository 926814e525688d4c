//! The capability set every generative model exposes to the host.

use crate::canvas::Canvas;
use crate::error::Result;
use rand::rngs::StdRng;

/// Outcome of a single `step`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// More work remains in the current run
    Working,
    /// The run hit its internal bound; further steps are no-ops
    Finished,
}

/// Optional capability: draw a fresh parameter assignment.
///
/// Implementations must leave derived state (caches, clamped bounds)
/// consistent before returning.
pub trait Randomize {
    fn randomize(&mut self, rng: &mut StdRng);
}

/// A generative model driven by the host
pub trait Model {
    /// Registry name, e.g. `"branch"`.
    fn name(&self) -> &'static str;

    /// Restore the documented default parameters. Idempotent.
    fn reset(&mut self);

    /// Discard any previous run and prepare a fresh one from the current
    /// parameters.
    fn begin(&mut self);

    /// One unit of generative work, drawing whatever it produces.
    fn step(&mut self, canvas: &mut dyn Canvas, rng: &mut StdRng) -> Result<Progress>;

    /// Randomization support, if this model has it.
    fn as_randomize(&mut self) -> Option<&mut dyn Randomize> {
        None
    }

    /// Run to completion from the current parameters.
    ///
    /// Returns the number of steps taken.
    fn go(&mut self, canvas: &mut dyn Canvas, rng: &mut StdRng) -> Result<usize> {
        self.begin();
        let mut steps = 0;
        while self.step(canvas, rng)? == Progress::Working {
            steps += 1;
        }
        Ok(steps)
    }
}
