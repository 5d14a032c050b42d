// Copyright (c) 2026 rezky_nightky

//! Per-tick motion laws. One law applies to the whole population of a run.

use crate::derive::{Configuration, MovementType};
use crate::draw::Canvas;
use crate::error::Result;
use crate::particle::Particle;
use crate::stream::SeededStream;
use crate::tuning::Tuning;

/// Time of the current tick and the gap since the previous one, in ms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    pub now_ms: f64,
    pub dt_ms: f64,
}

impl Clock {
    /// Phase in seconds scaled by the configured movement speed.
    fn phase(&self, config: &Configuration) -> f64 {
        self.now_ms * 0.001 * config.movement_speed
    }
}

pub fn apply(
    p: &mut Particle,
    clock: Clock,
    config: &Configuration,
    tuning: &Tuning,
    canvas: Canvas,
    stream: &mut SeededStream,
) -> Result<()> {
    match config.movement_type {
        MovementType::Wave => wave(p, clock, config, tuning),
        MovementType::Pulse => pulse(p, clock, config, tuning),
        MovementType::Jitter => jitter(p, config, tuning, canvas, stream)?,
        MovementType::Flow => flow(p, clock, config, tuning, canvas, stream),
        MovementType::Orbit => orbit(p, clock, config, tuning, canvas),
    }
    Ok(())
}

fn wave(p: &mut Particle, clock: Clock, config: &Configuration, tuning: &Tuning) {
    let phase = clock.phase(config);
    let k = tuning.wave_anchor_scale;
    p.x = p.origin_x + (phase + p.origin_y * k).sin() * config.movement_amplitude;
    p.y = p.origin_y + (phase + p.origin_x * k).cos() * config.movement_amplitude;
}

fn pulse(p: &mut Particle, clock: Clock, config: &Configuration, tuning: &Tuning) {
    let scale = 1.0 + clock.phase(config).sin() * tuning.pulse_depth;
    p.x = p.origin_x * scale;
    p.y = p.origin_y * scale;
}

/// Velocity component pointing back inside `[0, limit]` when `pos` is out.
fn reflect(pos: f64, v: f64, limit: f64) -> f64 {
    if pos < 0.0 {
        v.abs()
    } else if pos > limit {
        -v.abs()
    } else {
        v
    }
}

fn jitter(
    p: &mut Particle,
    config: &Configuration,
    tuning: &Tuning,
    canvas: Canvas,
    stream: &mut SeededStream,
) -> Result<()> {
    if stream.chance(tuning.jitter_reroll_chance) {
        p.vx = stream.range(-1.0, 1.0)? * config.movement_speed;
        p.vy = stream.range(-1.0, 1.0)? * config.movement_speed;
    }
    p.vx = reflect(p.x, p.vx, canvas.width);
    p.vy = reflect(p.y, p.vy, canvas.height);
    p.x += p.vx;
    p.y += p.vy;
    p.vx = reflect(p.x, p.vx, canvas.width);
    p.vy = reflect(p.y, p.vy, canvas.height);
    Ok(())
}

/// Sample of the flow field in `[-1, 1)`.
///
/// The field is a fresh uniform draw per sample, so the coordinates do not
/// shape the result; a coherent noise seeded from the stream could replace it
/// without changing any caller.
pub fn flow_noise(stream: &mut SeededStream, _x: f64, _y: f64, _z: f64) -> f64 {
    2.0 * stream.next() - 1.0
}

/// Exiting one edge re-enters from the opposite one.
fn wrap(pos: f64, limit: f64) -> f64 {
    if pos < 0.0 {
        limit
    } else if pos > limit {
        0.0
    } else {
        pos
    }
}

fn flow(
    p: &mut Particle,
    clock: Clock,
    config: &Configuration,
    tuning: &Tuning,
    canvas: Canvas,
    stream: &mut SeededStream,
) {
    let sx = p.x * tuning.flow_position_scale;
    let sy = p.y * tuning.flow_position_scale;
    let sz = clock.now_ms * tuning.flow_time_scale;
    let off = tuning.flow_second_sample_offset;

    let nx = flow_noise(stream, sx, sy, sz);
    let ny = flow_noise(stream, sx + off, sy + off, sz);

    let accel = tuning.flow_accel * config.movement_speed;
    p.vx = (p.vx + nx * accel) * tuning.flow_damping;
    p.vy = (p.vy + ny * accel) * tuning.flow_damping;
    p.x = wrap(p.x + p.vx, canvas.width);
    p.y = wrap(p.y + p.vy, canvas.height);
}

fn orbit(p: &mut Particle, clock: Clock, config: &Configuration, tuning: &Tuning, canvas: Canvas) {
    let (cx, cy) = canvas.center();
    let dx = p.origin_x - cx;
    let dy = p.origin_y - cy;
    let radius = dx.hypot(dy);
    if radius == 0.0 {
        p.x = cx;
        p.y = cy;
        return;
    }

    let angular = tuning.orbit_rate / (radius * tuning.orbit_radius_scale);
    let angle = dy.atan2(dx) + clock.phase(config) * angular;
    p.x = cx + angle.cos() * radius;
    p.y = cy + angle.sin() * radius;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::sample_config;
    use crate::stream::Seed;

    fn setup(movement: MovementType, x: f64, y: f64) -> (Configuration, Particle, SeededStream) {
        let mut config = sample_config();
        config.movement_type = movement;
        let mut s = SeededStream::new(&Seed::new("motion"));
        let p = Particle::spawn(x, y, &config, &Tuning::DEFAULT, &mut s).unwrap();
        (config, p, s)
    }

    fn at(now_ms: f64) -> Clock {
        Clock { now_ms, dt_ms: 16.0 }
    }

    #[test]
    fn wave_oscillates_around_anchor() {
        let (config, mut p, mut s) = setup(MovementType::Wave, 300.0, 200.0);
        let canvas = Canvas::new(640.0, 480.0);
        for t in [0.0, 250.0, 1000.0, 12345.0] {
            apply(&mut p, at(t), &config, &Tuning::DEFAULT, canvas, &mut s).unwrap();
            assert!((p.x - 300.0).abs() <= config.movement_amplitude);
            assert!((p.y - 200.0).abs() <= config.movement_amplitude);
        }
        apply(&mut p, at(0.0), &config, &Tuning::DEFAULT, canvas, &mut s).unwrap();
        assert!((p.x - (300.0 + (2.0f64).sin() * 10.0)).abs() < 1e-9);
        assert!((p.y - (200.0 + (3.0f64).cos() * 10.0)).abs() < 1e-9);
    }

    #[test]
    fn analytic_laws_take_no_draws() {
        for movement in [MovementType::Wave, MovementType::Pulse, MovementType::Orbit] {
            let (config, mut p, mut s) = setup(movement, 10.0, 20.0);
            let before = s.draws();
            apply(&mut p, at(500.0), &config, &Tuning::DEFAULT, Canvas::new(100.0, 100.0), &mut s)
                .unwrap();
            assert_eq!(s.draws(), before);
        }
    }

    #[test]
    fn pulse_scales_from_origin() {
        let (config, mut p, mut s) = setup(MovementType::Pulse, 100.0, 50.0);
        // phase = pi/2 at speed 1 -> scale 1.2
        let t = std::f64::consts::FRAC_PI_2 * 1000.0;
        apply(&mut p, at(t), &config, &Tuning::DEFAULT, Canvas::new(800.0, 600.0), &mut s)
            .unwrap();
        assert!((p.x - 120.0).abs() < 1e-9);
        assert!((p.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn jitter_reflects_at_right_edge() {
        let (config, mut p, mut s) = setup(MovementType::Jitter, 99.5, 50.0);
        let tuning = Tuning {
            jitter_reroll_chance: 0.0,
            ..Tuning::DEFAULT
        };
        let canvas = Canvas::new(100.0, 100.0);
        p.vx = 1.0;
        p.vy = 0.0;

        apply(&mut p, at(0.0), &config, &tuning, canvas, &mut s).unwrap();
        assert!(p.x > canvas.width);
        assert_eq!(p.vx, -1.0);

        apply(&mut p, at(16.0), &config, &tuning, canvas, &mut s).unwrap();
        assert!(p.x <= canvas.width);
        assert_eq!(p.vx, -1.0);
    }

    #[test]
    fn jitter_stays_bounded_over_many_ticks() {
        let (config, mut p, mut s) = setup(MovementType::Jitter, 50.0, 50.0);
        let canvas = Canvas::new(100.0, 80.0);
        let slack = config.movement_speed;
        for i in 0..10_000 {
            apply(&mut p, at(i as f64 * 16.0), &config, &Tuning::DEFAULT, canvas, &mut s)
                .unwrap();
            assert!(p.x >= -slack && p.x <= canvas.width + slack, "x {} at {}", p.x, i);
            assert!(p.y >= -slack && p.y <= canvas.height + slack, "y {} at {}", p.y, i);
        }
    }

    #[test]
    fn flow_wraps_right_edge_to_zero() {
        let (config, mut p, mut s) = setup(MovementType::Flow, 99.9, 40.0);
        let tuning = Tuning {
            flow_accel: 0.0,
            flow_damping: 1.0,
            ..Tuning::DEFAULT
        };
        let canvas = Canvas::new(100.0, 100.0);
        p.vx = 5.0;
        p.vy = 0.0;
        apply(&mut p, at(0.0), &config, &tuning, canvas, &mut s).unwrap();
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 40.0);

        p.x = 0.5;
        p.vx = -5.0;
        apply(&mut p, at(16.0), &config, &tuning, canvas, &mut s).unwrap();
        assert_eq!(p.x, canvas.width);
    }

    #[test]
    fn flow_draws_two_noise_samples_and_damps() {
        let (config, mut p, mut s) = setup(MovementType::Flow, 10.0, 10.0);
        p.vx = 0.0;
        p.vy = 0.0;
        let before = s.draws();
        apply(&mut p, at(0.0), &config, &Tuning::DEFAULT, Canvas::new(100.0, 100.0), &mut s)
            .unwrap();
        assert_eq!(s.draws(), before + 2);
        let limit = Tuning::DEFAULT.flow_accel * config.movement_speed * Tuning::DEFAULT.flow_damping;
        assert!(p.vx.abs() <= limit && p.vy.abs() <= limit);
    }

    #[test]
    fn orbit_keeps_radius_and_closer_spins_faster() {
        let canvas = Canvas::new(400.0, 400.0);
        let (config, mut near, mut s) = setup(MovementType::Orbit, 250.0, 200.0);
        let mut far = Particle::spawn(350.0, 200.0, &config, &Tuning::DEFAULT, &mut s).unwrap();

        let clock = at(100.0);
        apply(&mut near, clock, &config, &Tuning::DEFAULT, canvas, &mut s).unwrap();
        apply(&mut far, clock, &config, &Tuning::DEFAULT, canvas, &mut s).unwrap();

        let r_near = (near.x - 200.0).hypot(near.y - 200.0);
        let r_far = (far.x - 200.0).hypot(far.y - 200.0);
        assert!((r_near - 50.0).abs() < 1e-9);
        assert!((r_far - 150.0).abs() < 1e-9);

        let a_near = (near.y - 200.0).atan2(near.x - 200.0);
        let a_far = (far.y - 200.0).atan2(far.x - 200.0);
        assert!(a_near > a_far);
    }

    #[test]
    fn orbit_at_center_stays_put() {
        let (config, mut p, mut s) = setup(MovementType::Orbit, 200.0, 150.0);
        apply(&mut p, at(5000.0), &config, &Tuning::DEFAULT, Canvas::new(400.0, 300.0), &mut s)
            .unwrap();
        assert_eq!((p.x, p.y), (200.0, 150.0));
    }
}
