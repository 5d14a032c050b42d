// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid range: min {min} max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("cannot pick from an empty list of {what}")]
    EmptyChoice { what: &'static str },
}

pub type Result<T> = std::result::Result<T, EngineError>;
