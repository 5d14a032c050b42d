// Copyright (c) 2026 rezky_nightky

//! Probabilities, rates and bounds that shape movement and glitching.
//!
//! These are kept as data so tests can pin a branch (a zero chance never
//! fires, a chance of one always does) without touching the motion code.

/// Closed interval used for a `range` draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[cfg(test)]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Chance a particle takes the primary rather than the secondary color.
    pub primary_color_chance: f64,

    /// Interval while glitching, in ms.
    pub glitch_interval_ms: Span,
    /// Interval while steady, in seconds (drawn, then scaled by 1000).
    pub steady_interval_s: Span,

    /// Per-tick symbol swap chance is `glitch_intensity * dt_ms * symbol_swap_rate`.
    pub symbol_swap_rate: f64,
    pub color_swap_chance: f64,

    /// Chance a glitching particle flickers on a given frame.
    pub flicker_chance: f64,
    pub flicker_offset: f64,
    pub flicker_scale: Span,

    pub jitter_reroll_chance: f64,

    pub flow_position_scale: f64,
    pub flow_time_scale: f64,
    pub flow_second_sample_offset: f64,
    pub flow_accel: f64,
    pub flow_damping: f64,

    pub wave_anchor_scale: f64,
    pub pulse_depth: f64,
    pub orbit_rate: f64,
    pub orbit_radius_scale: f64,
}

impl Tuning {
    pub const DEFAULT: Tuning = Tuning {
        primary_color_chance: 0.7,
        glitch_interval_ms: Span::new(100.0, 500.0),
        steady_interval_s: Span::new(1.0, 5.0),
        symbol_swap_rate: 0.01,
        color_swap_chance: 0.3,
        flicker_chance: 0.5,
        flicker_offset: 5.0,
        flicker_scale: Span::new(0.8, 1.2),
        jitter_reroll_chance: 0.05,
        flow_position_scale: 0.005,
        flow_time_scale: 0.0001,
        flow_second_sample_offset: 100.0,
        flow_accel: 0.1,
        flow_damping: 0.99,
        wave_anchor_scale: 0.01,
        pulse_depth: 0.2,
        orbit_rate: 0.5,
        orbit_radius_scale: 0.01,
    };

    /// Bounds a steady interval can take once scaled to ms.
    #[cfg(test)]
    pub fn steady_interval_ms(&self) -> Span {
        Span::new(
            self.steady_interval_s.min * 1000.0,
            self.steady_interval_s.max * 1000.0,
        )
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}
