// Copyright (c) 2026 rezky_nightky

//! Turns the first draws of a seeded stream into the frozen [`Configuration`]
//! of a run.
//!
//! Draw order is part of the output: moving a single draw reshuffles every
//! field after it, so the sequence in [`derive`] must never change.

use tracing::debug;

use crate::error::Result;
use crate::palette::Hsl;
use crate::stream::SeededStream;

macro_rules! choice_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

choice_enum!(ColorScheme {
    Monochrome => "monochrome",
    Complementary => "complementary",
    Analogous => "analogous",
    Triadic => "triadic",
    Custom => "custom",
});

choice_enum!(PatternType {
    Matrix => "matrix",
    Grid => "grid",
    Flow => "flow",
    Particles => "particles",
    Symbols => "symbols",
});

choice_enum!(MovementType {
    Wave => "wave",
    Pulse => "pulse",
    Jitter => "jitter",
    Flow => "flow",
    Orbit => "orbit",
});

choice_enum!(SpecialFeature {
    InfinitySymbol => "infinitySymbol",
    CodeFragments => "codeFragments",
    MatrixEffect => "matrixEffect",
    ParticleSystem => "particleSystem",
    None => "none",
});

impl PatternType {
    /// Patterns laid out on a jittered grid rather than scattered.
    pub fn is_grid_like(self) -> bool {
        matches!(self, PatternType::Grid | PatternType::Matrix)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub density: f64,
    pub speed: f64,
    pub scale: f64,
    pub complexity: f64,

    pub color_scheme: ColorScheme,
    pub primary_color: Hsl,
    pub secondary_color: Hsl,
    pub background_color: Hsl,
    pub color_variation: f64,

    pub pattern_type: PatternType,
    pub glitch_intensity: f64,
    pub symbol_size: f64,
    pub symbol_spacing: f64,

    pub movement_type: MovementType,
    pub movement_speed: f64,
    pub movement_amplitude: f64,

    pub special_feature: SpecialFeature,
}

/// Flat, ordered label → value summary of a configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Features(Vec<(&'static str, String)>);

impl Features {
    #[allow(dead_code)]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(l, v)| (*l, v.as_str()))
    }
}

/// Receives the feature summary once, right after derivation.
pub trait FeatureSink {
    fn publish(&mut self, features: &Features);
}

impl<F: FnMut(&Features)> FeatureSink for F {
    fn publish(&mut self, features: &Features) {
        self(features)
    }
}

fn random_color(
    stream: &mut SeededStream,
    saturation: (f64, f64),
    lightness: (f64, f64),
) -> Result<Hsl> {
    let h = stream.next() * 360.0;
    let s = stream.range(saturation.0, saturation.1)?;
    let l = stream.range(lightness.0, lightness.1)?;
    Ok(Hsl::new(h, s, l))
}

const COLOR_SATURATION: (f64, f64) = (0.5, 1.0);
const BACKGROUND_SATURATION: (f64, f64) = (0.1, 0.3);
const COLOR_LIGHTNESS: (f64, f64) = (0.3, 0.7);

pub fn derive(
    stream: &mut SeededStream,
    sink: Option<&mut dyn FeatureSink>,
) -> Result<Configuration> {
    let density = stream.range(0.1, 1.0)?;
    let speed = stream.range(0.5, 5.0)?;
    let scale = stream.range(0.5, 2.0)?;
    let complexity = stream.range(0.1, 1.0)?;

    let color_scheme = *stream.pick_one("color schemes", ColorScheme::ALL)?;
    let primary_color = random_color(stream, COLOR_SATURATION, COLOR_LIGHTNESS)?;
    let secondary_color = random_color(stream, COLOR_SATURATION, COLOR_LIGHTNESS)?;
    let background_color = random_color(stream, BACKGROUND_SATURATION, COLOR_LIGHTNESS)?;
    let color_variation = stream.range(0.1, 0.5)?;

    let pattern_type = *stream.pick_one("pattern types", PatternType::ALL)?;
    let glitch_intensity = stream.range(0.05, 0.3)?;
    let symbol_size = stream.range(8.0, 24.0)?;
    let symbol_spacing = stream.range(1.0, 3.0)?;

    let movement_type = *stream.pick_one("movement types", MovementType::ALL)?;
    let movement_speed = stream.range(0.5, 3.0)?;
    let movement_amplitude = stream.range(5.0, 30.0)?;

    let special_feature = *stream.pick_one("special features", SpecialFeature::ALL)?;

    let config = Configuration {
        density,
        speed,
        scale,
        complexity,
        color_scheme,
        primary_color,
        secondary_color,
        background_color,
        color_variation,
        pattern_type,
        glitch_intensity,
        symbol_size,
        symbol_spacing,
        movement_type,
        movement_speed,
        movement_amplitude,
        special_feature,
    };

    debug!(draws = stream.draws(), "configuration derived");

    if let Some(sink) = sink {
        sink.publish(&features(&config));
    }

    Ok(config)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bucket(v: f64, labels: [&str; 3]) -> String {
    let label = if v < 0.3 {
        labels[0]
    } else if v < 0.7 {
        labels[1]
    } else {
        labels[2]
    };
    label.to_string()
}

pub fn features(config: &Configuration) -> Features {
    let special = match config.special_feature {
        SpecialFeature::None => "None".to_string(),
        other => capitalize(other.name()),
    };
    Features(vec![
        ("Pattern Type", capitalize(config.pattern_type.name())),
        ("Color Scheme", capitalize(config.color_scheme.name())),
        ("Density", bucket(config.density, ["Low", "Medium", "High"])),
        ("Movement Style", capitalize(config.movement_type.name())),
        (
            "Complexity",
            bucket(config.complexity, ["Simple", "Moderate", "Complex"]),
        ),
        ("Special Feature", special),
    ])
}

#[cfg(test)]
pub(crate) fn sample_config() -> Configuration {
    Configuration {
        density: 0.5,
        speed: 1.0,
        scale: 1.0,
        complexity: 0.5,
        color_scheme: ColorScheme::Custom,
        primary_color: Hsl::new(120.0, 0.8, 0.5),
        secondary_color: Hsl::new(300.0, 0.8, 0.5),
        background_color: Hsl::new(220.0, 0.2, 0.1),
        color_variation: 0.2,
        pattern_type: PatternType::Particles,
        glitch_intensity: 0.1,
        symbol_size: 16.0,
        symbol_spacing: 2.0,
        movement_type: MovementType::Wave,
        movement_speed: 1.0,
        movement_amplitude: 10.0,
        special_feature: SpecialFeature::None,
    }
}
