// Copyright (c) 2026 rezky_nightky

//! Full-frame effects drawn after the particles.

use std::f64::consts::PI;

use tracing::trace;

use crate::derive::{Configuration, SpecialFeature};
use crate::draw::{Canvas, DrawCommand};
use crate::error::Result;
use crate::stream::SeededStream;
use crate::symbols::{pick_symbol, SymbolCategory};

const INFINITY_SIZE: f64 = 0.3;
const INFINITY_STROKE: f64 = 0.05;
const INFINITY_ALPHA: f64 = 0.5;
const INFINITY_SPIN: f64 = 0.0005;
const INFINITY_STEP: f64 = 0.01;

const FRAGMENT_COUNT: usize = 20;
const FRAGMENT_SIZE: f64 = 16.0;
const FRAGMENT_ALPHA: f64 = 0.2;

const RAIN_ALPHA: f64 = 0.5;
const RAIN_FALL: f64 = 2.0;

/// Bernoulli's lemniscate of half-width `k` at parameter `t`.
pub fn lemniscate(k: f64, t: f64) -> (f64, f64) {
    let (s, c) = t.sin_cos();
    let d = 1.0 + c * c;
    (k * s / d, k * s * c / d)
}

#[derive(Clone, Debug)]
pub struct Overlay {
    feature: SpecialFeature,
    /// Fall position per column; `None` until the first rain frame.
    rain: Option<Vec<f64>>,
}

impl Overlay {
    pub fn new(feature: SpecialFeature) -> Self {
        Self {
            feature,
            rain: None,
        }
    }

    /// Drops per-column state; the next frame re-seeds it.
    pub fn reset(&mut self) {
        self.rain = None;
    }

    #[cfg(test)]
    pub fn rain_positions(&self) -> Option<&[f64]> {
        self.rain.as_deref()
    }

    pub fn draw(
        &mut self,
        now_ms: f64,
        config: &Configuration,
        canvas: Canvas,
        stream: &mut SeededStream,
        out: &mut Vec<DrawCommand>,
    ) -> Result<()> {
        match self.feature {
            SpecialFeature::InfinitySymbol => {
                out.push(infinity(now_ms, config, canvas));
                Ok(())
            }
            SpecialFeature::CodeFragments => code_fragments(config, canvas, stream, out),
            SpecialFeature::MatrixEffect => self.matrix_rain(config, canvas, stream, out),
            SpecialFeature::ParticleSystem | SpecialFeature::None => Ok(()),
        }
    }

    fn matrix_rain(
        &mut self,
        config: &Configuration,
        canvas: Canvas,
        stream: &mut SeededStream,
        out: &mut Vec<DrawCommand>,
    ) -> Result<()> {
        if self.rain.is_none() {
            let cols = if canvas.is_degenerate() || config.symbol_size <= 0.0 {
                0
            } else {
                (canvas.width / config.symbol_size).floor() as usize
            };
            trace!(cols, "matrix rain seeded");
            self.rain = Some((0..cols).map(|_| stream.next() * canvas.height).collect());
        }
        let Some(positions) = self.rain.as_mut() else {
            return Ok(());
        };

        for (i, y) in positions.iter_mut().enumerate() {
            let text = pick_symbol(stream, SymbolCategory::Alphanumeric)?;
            *y += config.movement_speed * RAIN_FALL;
            if *y > canvas.height {
                *y = 0.0;
            }
            out.push(DrawCommand::Glyph {
                x: i as f64 * config.symbol_size,
                y: *y,
                text,
                size: config.symbol_size,
                color: config.primary_color,
                alpha: RAIN_ALPHA,
                rotation: 0.0,
                offset: (0.0, 0.0),
                scale: (1.0, 1.0),
            });
        }
        Ok(())
    }
}

fn infinity(now_ms: f64, config: &Configuration, canvas: Canvas) -> DrawCommand {
    let (cx, cy) = canvas.center();
    let size = canvas.width.min(canvas.height) * INFINITY_SIZE;
    let (sin_r, cos_r) = (now_ms * INFINITY_SPIN * config.movement_speed).sin_cos();

    let steps = (2.0 * PI / INFINITY_STEP).floor() as usize;
    let points = (0..=steps)
        .map(|i| {
            let (x, y) = lemniscate(size, i as f64 * INFINITY_STEP);
            (cx + x * cos_r - y * sin_r, cy + x * sin_r + y * cos_r)
        })
        .collect();

    DrawCommand::Path {
        points,
        color: config.primary_color,
        alpha: INFINITY_ALPHA,
        width: size * INFINITY_STROKE,
    }
}

fn code_fragments(
    config: &Configuration,
    canvas: Canvas,
    stream: &mut SeededStream,
    out: &mut Vec<DrawCommand>,
) -> Result<()> {
    for _ in 0..FRAGMENT_COUNT {
        let x = stream.next() * canvas.width;
        let y = stream.next() * canvas.height;
        let text = pick_symbol(stream, SymbolCategory::CodeFragments)?;
        out.push(DrawCommand::Glyph {
            x,
            y,
            text,
            size: FRAGMENT_SIZE,
            color: config.secondary_color,
            alpha: FRAGMENT_ALPHA,
            rotation: 0.0,
            offset: (0.0, 0.0),
            scale: (1.0, 1.0),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::sample_config;
    use crate::stream::Seed;

    fn stream() -> SeededStream {
        SeededStream::new(&Seed::new("overlay"))
    }

    fn with_feature(feature: SpecialFeature) -> (Configuration, Overlay) {
        let mut config = sample_config();
        config.special_feature = feature;
        (config, Overlay::new(feature))
    }

    #[test]
    fn lemniscate_shape() {
        assert_eq!(lemniscate(10.0, 0.0), (0.0, 0.0));
        let (x, y) = lemniscate(10.0, PI / 2.0);
        assert!((x - 10.0).abs() < 1e-12 && y.abs() < 1e-12);
        let (x, _) = lemniscate(10.0, 3.0 * PI / 2.0);
        assert!((x + 10.0).abs() < 1e-12);
    }

    #[test]
    fn infinity_is_one_centered_path() {
        let (config, mut overlay) = with_feature(SpecialFeature::InfinitySymbol);
        let canvas = Canvas::new(400.0, 200.0);
        let mut out = Vec::new();
        let mut s = stream();
        overlay.draw(0.0, &config, canvas, &mut s, &mut out).unwrap();
        assert_eq!(s.draws(), 0);
        assert_eq!(out.len(), 1);
        match &out[0] {
            DrawCommand::Path { points, width, alpha, .. } => {
                assert_eq!(points.len(), 629);
                assert_eq!(points[0], (200.0, 100.0));
                assert!((width - 3.0).abs() < 1e-12);
                assert_eq!(*alpha, 0.5);
                let max_dx = points.iter().map(|p| (p.0 - 200.0).abs()).fold(0.0, f64::max);
                assert!((max_dx - 60.0).abs() < 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn infinity_rotates_with_time() {
        let (config, mut overlay) = with_feature(SpecialFeature::InfinitySymbol);
        let canvas = Canvas::new(400.0, 400.0);
        let mut a = Vec::new();
        let mut b = Vec::new();
        overlay.draw(0.0, &config, canvas, &mut stream(), &mut a).unwrap();
        overlay.draw(1000.0, &config, canvas, &mut stream(), &mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn code_fragments_are_twenty_faint_tokens() {
        let (config, mut overlay) = with_feature(SpecialFeature::CodeFragments);
        let canvas = Canvas::new(300.0, 300.0);
        let mut out = Vec::new();
        let mut s = stream();
        overlay.draw(0.0, &config, canvas, &mut s, &mut out).unwrap();
        assert_eq!(out.len(), 20);
        assert_eq!(s.draws(), 60);
        for cmd in &out {
            match cmd {
                DrawCommand::Glyph { x, y, text, alpha, color, .. } => {
                    assert!(*x < 300.0 && *y < 300.0);
                    assert!(SymbolCategory::CodeFragments.glyphs().contains(text));
                    assert_eq!(*alpha, 0.2);
                    assert_eq!(*color, config.secondary_color);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(overlay.rain_positions().is_none());
    }

    #[test]
    fn matrix_rain_seeds_lazily_and_persists() {
        let (config, mut overlay) = with_feature(SpecialFeature::MatrixEffect);
        let canvas = Canvas::new(160.0, 100.0);
        let mut s = stream();
        assert!(overlay.rain_positions().is_none());

        let mut out = Vec::new();
        overlay.draw(0.0, &config, canvas, &mut s, &mut out).unwrap();
        let first = overlay.rain_positions().unwrap().to_vec();
        assert_eq!(first.len(), 10);
        assert_eq!(out.len(), 10);

        out.clear();
        overlay.draw(16.0, &config, canvas, &mut s, &mut out).unwrap();
        let second = overlay.rain_positions().unwrap();
        for (a, b) in first.iter().zip(second) {
            let fell = a + 2.0 * config.movement_speed;
            if fell > canvas.height {
                assert_eq!(*b, 0.0);
            } else {
                assert_eq!(*b, fell);
            }
        }
        for (i, cmd) in out.iter().enumerate() {
            match cmd {
                DrawCommand::Glyph { x, .. } => assert_eq!(*x, i as f64 * 16.0),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn matrix_rain_wraps_to_top() {
        let (config, mut overlay) = with_feature(SpecialFeature::MatrixEffect);
        let canvas = Canvas::new(32.0, 10.0);
        let mut s = stream();
        let mut out = Vec::new();
        for _ in 0..20 {
            overlay.draw(0.0, &config, canvas, &mut s, &mut out).unwrap();
            for y in overlay.rain_positions().unwrap() {
                assert!((0.0..=10.0).contains(y));
            }
        }
        overlay.reset();
        assert!(overlay.rain_positions().is_none());
    }

    #[test]
    fn quiet_features_draw_nothing() {
        for feature in [SpecialFeature::ParticleSystem, SpecialFeature::None] {
            let (config, mut overlay) = with_feature(feature);
            let mut out = Vec::new();
            let mut s = stream();
            overlay
                .draw(0.0, &config, Canvas::new(100.0, 100.0), &mut s, &mut out)
                .unwrap();
            assert!(out.is_empty());
            assert_eq!(s.draws(), 0);
        }
    }
}
