//! The host side: a registry of models sharing one canvas background and
//! one random source, with the actions of the control panel.

use crate::canvas::Canvas;
use crate::config::Background;
use crate::error::{Error, Result};
use crate::model::{Model, Progress};
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{debug, info};

pub struct Studio {
    models: Vec<Box<dyn Model>>,
    selected: Option<usize>,
    background: Background,
    rng: StdRng,
}

impl Studio {
    pub fn new(background: Background, rng: StdRng) -> Self {
        Self {
            models: Vec::new(),
            selected: None,
            background,
            rng,
        }
    }

    /// Add a model, replacing one with the same name. The first model
    /// registered becomes the selection.
    pub fn register(&mut self, model: Box<dyn Model>) {
        let name = model.name();
        match self.models.iter().position(|m| m.name() == name) {
            Some(i) => self.models[i] = model,
            None => self.models.push(model),
        }
        if self.selected.is_none() {
            self.selected = Some(0);
        }
    }

    pub fn model_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.models.iter().map(|m| m.name())
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        let i = self
            .models
            .iter()
            .position(|m| m.name() == name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))?;
        self.selected = Some(i);
        debug!(model = name, "model selected");
        Ok(())
    }

    /// Select the model registered after the current one, wrapping around.
    pub fn next_model(&mut self) -> Result<&'static str> {
        let i = self.selected.ok_or(Error::NoModel)?;
        let next = (i + 1) % self.models.len();
        self.selected = Some(next);
        let name = self.models[next].name();
        debug!(model = name, "model selected");
        Ok(name)
    }

    pub fn current(&self) -> Result<&dyn Model> {
        let i = self.selected.ok_or(Error::NoModel)?;
        Ok(self.models[i].as_ref())
    }

    fn current_mut(&mut self) -> Result<&mut Box<dyn Model>> {
        let i = self.selected.ok_or(Error::NoModel)?;
        Ok(&mut self.models[i])
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Restore the selected model's default parameters.
    pub fn reset(&mut self) -> Result<()> {
        let model = self.current_mut()?;
        model.reset();
        info!(model = model.name(), "parameters reset");
        Ok(())
    }

    /// Randomize the selected model. `false` when it has no randomization.
    pub fn randomize(&mut self) -> Result<bool> {
        let i = self.selected.ok_or(Error::NoModel)?;
        let model = &mut self.models[i];
        let name = model.name();
        match model.as_randomize() {
            Some(r) => {
                r.randomize(&mut self.rng);
                info!(model = name, "parameters randomized");
                Ok(true)
            }
            None => {
                info!(model = name, "this model cannot be randomized");
                Ok(false)
            }
        }
    }

    /// Rewind the selected model's run without drawing.
    pub fn restart(&mut self) -> Result<()> {
        self.current_mut()?.begin();
        Ok(())
    }

    /// Step the selected model to the end of its run over whatever is
    /// already on the canvas. Pair with `restart` to redraw without clearing.
    pub fn resume(&mut self, canvas: &mut dyn Canvas) -> Result<usize> {
        let i = self.selected.ok_or(Error::NoModel)?;
        let model = &mut self.models[i];
        let mut steps = 0;
        while model.step(canvas, &mut self.rng)? == Progress::Working {
            steps += 1;
        }
        canvas.present()?;
        info!(model = model.name(), steps, "run resumed");
        Ok(steps)
    }

    /// Paint the canvas with the background color.
    pub fn clear(&self, canvas: &mut dyn Canvas) -> Result<()> {
        canvas.fill(self.background.color());
        canvas.present()
    }

    /// Clear the canvas and run the selected model to completion.
    ///
    /// Returns the number of steps the run took.
    pub fn go(&mut self, canvas: &mut dyn Canvas) -> Result<usize> {
        let i = self.selected.ok_or(Error::NoModel)?;
        canvas.fill(self.background.color());

        let started = Instant::now();
        let model = &mut self.models[i];
        let steps = model.go(canvas, &mut self.rng)?;
        canvas.present()?;
        info!(
            model = model.name(),
            steps,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run complete"
        );
        Ok(steps)
    }
}
