// Copyright (c) 2026 rezky_nightky

//! The animation engine: one seeded stream, one frozen configuration, one
//! particle population and one overlay, advanced a tick at a time.

use tracing::{debug, info};

use crate::derive::{self, Configuration, FeatureSink, Features};
use crate::draw::{Canvas, DrawCommand};
use crate::error::Result;
use crate::motion::Clock;
use crate::overlay::Overlay;
use crate::particle::Population;
use crate::stream::{Seed, SeededStream};
use crate::tuning::Tuning;

pub struct Engine {
    stream: SeededStream,
    config: Configuration,
    features: Features,
    tuning: Tuning,
    canvas: Canvas,
    population: Population,
    overlay: Overlay,
    last_ms: Option<f64>,
}

impl Engine {
    /// Derives the configuration from `seed` and builds the first population.
    ///
    /// The sink, when given, receives the feature summary exactly once.
    pub fn initialize(
        seed: &Seed,
        canvas: Canvas,
        sink: Option<&mut dyn FeatureSink>,
    ) -> Result<Self> {
        Self::with_tuning(seed, canvas, Tuning::DEFAULT, sink)
    }

    pub fn with_tuning(
        seed: &Seed,
        canvas: Canvas,
        tuning: Tuning,
        sink: Option<&mut dyn FeatureSink>,
    ) -> Result<Self> {
        let mut stream = SeededStream::new(seed);
        let config = derive::derive(&mut stream, sink)?;
        let features = derive::features(&config);
        let population = Population::build(&config, &tuning, canvas, &mut stream)?;

        info!(
            seed = %seed,
            pattern = config.pattern_type.name(),
            movement = config.movement_type.name(),
            special = config.special_feature.name(),
            particles = population.len(),
            "engine initialized"
        );

        Ok(Self {
            stream,
            overlay: Overlay::new(config.special_feature),
            config,
            features,
            tuning,
            canvas,
            population,
            last_ms: None,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Replaces the population for a new canvas size.
    ///
    /// The new set is built aside and swapped in whole, so a failed build
    /// leaves the previous population untouched.
    pub fn on_resize(&mut self, canvas: Canvas) -> Result<()> {
        let population = Population::build(&self.config, &self.tuning, canvas, &mut self.stream)?;
        debug!(
            from_w = self.canvas.width,
            from_h = self.canvas.height,
            to_w = canvas.width,
            to_h = canvas.height,
            grid = ?population.grid,
            "resize"
        );
        self.population = population;
        self.canvas = canvas;
        self.overlay.reset();
        Ok(())
    }

    /// Advances every particle and the overlay, returning the frame in paint
    /// order: background, particles, overlay.
    ///
    /// `timestamp_ms` must be monotonic; the first tick has a zero delta.
    pub fn tick(&mut self, timestamp_ms: f64, canvas: Canvas) -> Result<Vec<DrawCommand>> {
        if canvas != self.canvas {
            self.on_resize(canvas)?;
        }

        let dt_ms = self.last_ms.map_or(0.0, |last| timestamp_ms - last);
        self.last_ms = Some(timestamp_ms);
        let clock = Clock {
            now_ms: timestamp_ms,
            dt_ms,
        };

        let mut out = Vec::with_capacity(self.population.len() + 2);
        out.push(DrawCommand::Clear {
            color: self.config.background_color,
        });

        for p in &mut self.population.particles {
            p.update(clock, &self.config, &self.tuning, self.canvas, &mut self.stream)?;
            out.push(p.draw(&self.tuning, &mut self.stream)?);
        }

        self.overlay.draw(
            timestamp_ms,
            &self.config,
            self.canvas,
            &mut self.stream,
            &mut out,
        )?;

        Ok(out)
    }
}
