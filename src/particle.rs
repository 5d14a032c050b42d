// Copyright (c) 2026 rezky_nightky

use std::f64::consts::PI;

use tracing::debug;

use crate::derive::Configuration;
use crate::draw::{Canvas, DrawCommand};
use crate::error::Result;
use crate::motion::{self, Clock};
use crate::palette::Hsl;
use crate::stream::SeededStream;
use crate::symbols::pick_particle_symbol;
use crate::tuning::Tuning;

/// Particles per canvas pixel before density and scale.
const PARTICLES_PER_PIXEL: f64 = 0.0001;
/// Grid jitter as a fraction of the cell size, each way.
const GRID_JITTER: f64 = 0.2;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub symbol: &'static str,
    pub color: Hsl,
    pub alpha: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub glitch_timer: f64,
    pub glitch_interval: f64,
    pub is_glitching: bool,
}

fn pick_color(config: &Configuration, tuning: &Tuning, stream: &mut SeededStream) -> Hsl {
    if stream.chance(tuning.primary_color_chance) {
        config.primary_color
    } else {
        config.secondary_color
    }
}

fn steady_interval(tuning: &Tuning, stream: &mut SeededStream) -> Result<f64> {
    let s = tuning.steady_interval_s;
    Ok(stream.range(s.min, s.max)? * 1000.0)
}

impl Particle {
    pub fn spawn(
        x: f64,
        y: f64,
        config: &Configuration,
        tuning: &Tuning,
        stream: &mut SeededStream,
    ) -> Result<Self> {
        let vx = stream.range(-1.0, 1.0)? * config.movement_speed;
        let vy = stream.range(-1.0, 1.0)? * config.movement_speed;
        let size = stream.range(config.symbol_size * 0.5, config.symbol_size * 1.5)?;
        let symbol = pick_particle_symbol(stream)?;
        let color = pick_color(config, tuning, stream);
        let alpha = stream.range(0.3, 1.0)?;
        let rotation = stream.next() * PI * 2.0;
        let rotation_speed = stream.range(-0.05, 0.05)?;
        let glitch_interval = steady_interval(tuning, stream)?;

        Ok(Self {
            x,
            y,
            origin_x: x,
            origin_y: y,
            vx,
            vy,
            size,
            symbol,
            color,
            alpha,
            rotation,
            rotation_speed,
            glitch_timer: 0.0,
            glitch_interval,
            is_glitching: false,
        })
    }

    /// One tick: motion law, spin, then glitch bookkeeping.
    pub fn update(
        &mut self,
        clock: Clock,
        config: &Configuration,
        tuning: &Tuning,
        canvas: Canvas,
        stream: &mut SeededStream,
    ) -> Result<()> {
        motion::apply(self, clock, config, tuning, canvas, stream)?;
        self.rotation += self.rotation_speed;
        self.advance_glitch(clock.dt_ms, config, tuning, stream)
    }

    fn advance_glitch(
        &mut self,
        dt_ms: f64,
        config: &Configuration,
        tuning: &Tuning,
        stream: &mut SeededStream,
    ) -> Result<()> {
        self.glitch_timer += dt_ms;
        if self.glitch_timer > self.glitch_interval {
            self.is_glitching = !self.is_glitching;
            if self.is_glitching {
                let g = tuning.glitch_interval_ms;
                self.glitch_interval = stream.range(g.min, g.max)?;
            } else {
                self.symbol = pick_particle_symbol(stream)?;
                self.glitch_interval = steady_interval(tuning, stream)?;
            }
            self.glitch_timer = 0.0;
        }

        let swap_chance = config.glitch_intensity * dt_ms * tuning.symbol_swap_rate;
        if stream.chance(swap_chance) {
            self.symbol = pick_particle_symbol(stream)?;
            if stream.chance(tuning.color_swap_chance) {
                self.color = pick_color(config, tuning, stream);
            }
        }
        Ok(())
    }

    /// Glitching particles flicker: a fresh offset and squash on some frames.
    pub fn draw(&self, tuning: &Tuning, stream: &mut SeededStream) -> Result<DrawCommand> {
        let mut offset = (0.0, 0.0);
        let mut scale = (1.0, 1.0);
        if self.is_glitching && stream.chance(tuning.flicker_chance) {
            let o = tuning.flicker_offset;
            let s = tuning.flicker_scale;
            offset = (stream.range(-o, o)?, stream.range(-o, o)?);
            scale = (stream.range(s.min, s.max)?, stream.range(s.min, s.max)?);
        }

        Ok(DrawCommand::Glyph {
            x: self.x,
            y: self.y,
            text: self.symbol,
            size: self.size,
            color: self.color,
            alpha: self.alpha,
            rotation: self.rotation,
            offset,
            scale,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
}

pub fn particle_count(canvas: Canvas, density: f64, scale: f64) -> usize {
    if canvas.is_degenerate() {
        return 0;
    }
    let area = canvas.width * canvas.height;
    (area * PARTICLES_PER_PIXEL * density * scale).floor().max(0.0) as usize
}

/// Columns follow the canvas aspect ratio; rows take what the count allows.
pub fn grid_layout(count: usize, canvas: Canvas) -> GridLayout {
    if count == 0 || canvas.is_degenerate() {
        return GridLayout { cols: 0, rows: 0 };
    }
    let cols = (count as f64 * canvas.width / canvas.height).sqrt().floor() as usize;
    if cols == 0 {
        return GridLayout { cols: 0, rows: 0 };
    }
    GridLayout {
        cols,
        rows: count / cols,
    }
}

#[derive(Clone, Debug, Default)]
pub struct Population {
    pub particles: Vec<Particle>,
    pub grid: Option<GridLayout>,
}

impl Population {
    pub fn build(
        config: &Configuration,
        tuning: &Tuning,
        canvas: Canvas,
        stream: &mut SeededStream,
    ) -> Result<Self> {
        let count = particle_count(canvas, config.density, config.scale);
        let mut particles = Vec::with_capacity(count);
        let mut grid = None;

        if config.pattern_type.is_grid_like() {
            let layout = grid_layout(count, canvas);
            if layout.cols > 0 && layout.rows > 0 {
                let cell_w = canvas.width / layout.cols as f64;
                let cell_h = canvas.height / layout.rows as f64;
                for row in 0..layout.rows {
                    for col in 0..layout.cols {
                        let x = col as f64 * cell_w + cell_w / 2.0;
                        let y = row as f64 * cell_h + cell_h / 2.0;
                        let jx = stream.range(-cell_w * GRID_JITTER, cell_w * GRID_JITTER)?;
                        let jy = stream.range(-cell_h * GRID_JITTER, cell_h * GRID_JITTER)?;
                        particles.push(Particle::spawn(x + jx, y + jy, config, tuning, stream)?);
                    }
                }
            }
            grid = Some(layout);
        } else {
            for _ in 0..count {
                let x = stream.next() * canvas.width;
                let y = stream.next() * canvas.height;
                particles.push(Particle::spawn(x, y, config, tuning, stream)?);
            }
        }

        debug!(
            count = particles.len(),
            width = canvas.width,
            height = canvas.height,
            ?grid,
            "population built"
        );

        Ok(Self { particles, grid })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{sample_config, PatternType};
    use crate::stream::Seed;

    fn stream(seed: &str) -> SeededStream {
        SeededStream::new(&Seed::new(seed))
    }

    #[test]
    fn count_formula() {
        let canvas = Canvas::new(1000.0, 1000.0);
        assert_eq!(particle_count(canvas, 0.5, 1.0), 50);
        assert_eq!(particle_count(canvas, 1.0, 2.0), 200);
        assert_eq!(particle_count(Canvas::new(0.0, 1000.0), 1.0, 1.0), 0);
    }

    #[test]
    fn scattered_population_has_formula_count() {
        let config = sample_config();
        let pop = Population::build(
            &config,
            &Tuning::DEFAULT,
            Canvas::new(1000.0, 1000.0),
            &mut stream("pop"),
        )
        .unwrap();
        assert_eq!(pop.len(), 50);
        assert_eq!(pop.grid, None);
        for p in &pop.particles {
            assert!((0.0..1000.0).contains(&p.x) && (0.0..1000.0).contains(&p.y));
            assert_eq!((p.x, p.y), (p.origin_x, p.origin_y));
        }
    }

    #[test]
    fn grid_partition_for_two_to_one_canvas() {
        let layout = grid_layout(48, Canvas::new(200.0, 100.0));
        assert_eq!(layout.cols, 9);
        assert_eq!(layout.rows, 5);
        assert!(layout.cols * layout.rows <= 48);
        assert_eq!(layout.cols, (48.0f64 * 2.0).sqrt().floor() as usize);
    }

    #[test]
    fn grid_population_stays_near_cell_centers() {
        let mut config = sample_config();
        config.pattern_type = PatternType::Grid;
        config.density = 0.48;
        // 2000 x 500 at density 0.48, scale 1 gives 48 particles.
        let canvas = Canvas::new(2000.0, 500.0);
        let pop = Population::build(&config, &Tuning::DEFAULT, canvas, &mut stream("grid"))
            .unwrap();
        let layout = pop.grid.unwrap();
        assert_eq!(layout.cols * layout.rows, pop.len());
        assert!(pop.len() <= 48);

        let cell_w = canvas.width / layout.cols as f64;
        let cell_h = canvas.height / layout.rows as f64;
        for (i, p) in pop.particles.iter().enumerate() {
            let (row, col) = (i / layout.cols, i % layout.cols);
            let cx = col as f64 * cell_w + cell_w / 2.0;
            let cy = row as f64 * cell_h + cell_h / 2.0;
            assert!((p.x - cx).abs() <= cell_w * GRID_JITTER);
            assert!((p.y - cy).abs() <= cell_h * GRID_JITTER);
        }
    }

    #[test]
    fn degenerate_canvas_builds_nothing() {
        let mut config = sample_config();
        for pattern in PatternType::ALL {
            config.pattern_type = *pattern;
            for canvas in [Canvas::new(0.0, 600.0), Canvas::new(800.0, 0.0)] {
                let mut s = stream("empty");
                let pop = Population::build(&config, &Tuning::DEFAULT, canvas, &mut s).unwrap();
                assert_eq!(pop.len(), 0);
                assert_eq!(s.draws(), 0);
            }
        }
    }

    #[test]
    fn tall_grid_with_zero_columns_is_empty() {
        assert_eq!(
            grid_layout(1, Canvas::new(10.0, 1000.0)),
            GridLayout { cols: 0, rows: 0 }
        );
    }

    #[test]
    fn same_seed_same_particles() {
        let config = sample_config();
        let canvas = Canvas::new(640.0, 480.0);
        let a = Population::build(&config, &Tuning::DEFAULT, canvas, &mut stream("twin")).unwrap();
        let b = Population::build(&config, &Tuning::DEFAULT, canvas, &mut stream("twin")).unwrap();
        assert_eq!(a.particles, b.particles);
    }

    #[test]
    fn spawned_attributes_in_bounds() {
        let config = sample_config();
        let mut s = stream("attrs");
        for _ in 0..200 {
            let p = Particle::spawn(1.0, 2.0, &config, &Tuning::DEFAULT, &mut s).unwrap();
            assert!(p.vx.abs() <= config.movement_speed);
            assert!((8.0..=24.0).contains(&p.size));
            assert!((0.3..=1.0).contains(&p.alpha));
            assert!((0.0..PI * 2.0).contains(&p.rotation));
            assert!(p.rotation_speed.abs() <= 0.05);
            assert!(Tuning::DEFAULT.steady_interval_ms().contains(p.glitch_interval));
            assert!(!p.is_glitching);
            assert!(p.color == config.primary_color || p.color == config.secondary_color);
        }
    }

    #[test]
    fn glitch_intervals_respect_state_bounds() {
        let mut config = sample_config();
        config.glitch_intensity = 0.0;
        let tuning = Tuning::DEFAULT;
        let mut s = stream("toggles");
        let mut p = Particle::spawn(0.0, 0.0, &config, &tuning, &mut s).unwrap();

        let mut toggles = 0;
        while toggles < 1000 {
            let before = p.is_glitching;
            p.advance_glitch(p.glitch_interval + 1.0, &config, &tuning, &mut s)
                .unwrap();
            assert_ne!(before, p.is_glitching);
            toggles += 1;
            if p.is_glitching {
                assert!(tuning.glitch_interval_ms.contains(p.glitch_interval));
            } else {
                assert!(tuning.steady_interval_ms().contains(p.glitch_interval));
            }
            assert_eq!(p.glitch_timer, 0.0);
        }
    }

    #[test]
    fn leaving_glitch_draws_a_fresh_symbol() {
        let mut config = sample_config();
        config.glitch_intensity = 0.0;
        let tuning = Tuning::DEFAULT;
        let mut s = stream("relapse");
        let mut p = Particle::spawn(0.0, 0.0, &config, &tuning, &mut s).unwrap();

        let before = s.draws();
        p.advance_glitch(p.glitch_interval + 1.0, &config, &tuning, &mut s)
            .unwrap();
        assert!(p.is_glitching);
        // interval, then the swap roll
        assert_eq!(s.draws(), before + 2);

        let mut twin = s.clone();
        let expected = pick_particle_symbol(&mut twin).unwrap();
        let before = s.draws();
        p.advance_glitch(p.glitch_interval + 1.0, &config, &tuning, &mut s)
            .unwrap();
        assert!(!p.is_glitching);
        // category and glyph, interval, swap roll
        assert_eq!(s.draws(), before + 4);
        assert_eq!(p.symbol, expected);
    }

    #[test]
    fn timer_below_interval_does_not_toggle() {
        let mut config = sample_config();
        config.glitch_intensity = 0.0;
        let mut s = stream("quiet");
        let mut p = Particle::spawn(0.0, 0.0, &config, &Tuning::DEFAULT, &mut s).unwrap();
        let symbol = p.symbol;
        p.advance_glitch(p.glitch_interval * 0.5, &config, &Tuning::DEFAULT, &mut s)
            .unwrap();
        assert!(!p.is_glitching);
        assert_eq!(p.symbol, symbol);
        assert!(p.glitch_timer > 0.0);
    }

    #[test]
    fn certain_swap_changes_color_when_nested_chance_fires() {
        let config = sample_config();
        let tuning = Tuning {
            symbol_swap_rate: f64::INFINITY,
            color_swap_chance: 1.0,
            primary_color_chance: 0.0,
            ..Tuning::DEFAULT
        };
        let mut s = stream("swap");
        let mut p = Particle::spawn(0.0, 0.0, &config, &tuning, &mut s).unwrap();
        p.color = config.primary_color;
        p.advance_glitch(1.0, &config, &tuning, &mut s).unwrap();
        assert_eq!(p.color, config.secondary_color);
    }

    #[test]
    fn steady_draw_has_no_flicker() {
        let config = sample_config();
        let mut s = stream("steady");
        let p = Particle::spawn(5.0, 6.0, &config, &Tuning::DEFAULT, &mut s).unwrap();
        let before = s.draws();
        let cmd = p.draw(&Tuning::DEFAULT, &mut s).unwrap();
        assert_eq!(s.draws(), before);
        match cmd {
            DrawCommand::Glyph {
                x, y, offset, scale, ..
            } => {
                assert_eq!((x, y), (5.0, 6.0));
                assert_eq!(offset, (0.0, 0.0));
                assert_eq!(scale, (1.0, 1.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn glitching_draw_flickers_within_bounds() {
        let config = sample_config();
        let tuning = Tuning {
            flicker_chance: 1.0,
            ..Tuning::DEFAULT
        };
        let mut s = stream("flicker");
        let mut p = Particle::spawn(5.0, 6.0, &config, &tuning, &mut s).unwrap();
        p.is_glitching = true;
        let mut offsets = Vec::new();
        for _ in 0..10 {
            match p.draw(&tuning, &mut s).unwrap() {
                DrawCommand::Glyph { offset, scale, .. } => {
                    assert!(offset.0.abs() <= 5.0 && offset.1.abs() <= 5.0);
                    assert!(tuning.flicker_scale.contains(scale.0));
                    assert!(tuning.flicker_scale.contains(scale.1));
                    offsets.push(offset);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(offsets.windows(2).any(|w| w[0] != w[1]));
    }
}
