// Copyright (c) 2026 rezky_nightky

//! Seeded random stream.
//!
//! Every random decision in the engine is taken through [`SeededStream`], and
//! every helper on it is defined in terms of [`SeededStream::next`] with a
//! fixed number of draws, so a seed replays the same piece on any machine:
//!
//! * `next`, `range`, `chance`: one draw
//! * `int_range`, `pick_one`: one draw (`range` followed by `floor`)

use std::fmt;

use rand::RngCore;

use crate::error::{EngineError, Result};

const FXHASH_ALPHABET: &[u8] = b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";
const FXHASH_BODY_LEN: usize = 49;

/// Opaque seed text. Integers are seeded through their decimal form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Seed(String);

impl Seed {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Mints an fxhash-style seed (`oo` + 49 base58 characters).
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut s = String::with_capacity(2 + FXHASH_BODY_LEN);
        s.push_str("oo");
        for _ in 0..FXHASH_BODY_LEN {
            let idx = rng.random_range(0..FXHASH_ALPHABET.len());
            s.push(FXHASH_ALPHABET[idx] as char);
        }
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Seed {
    fn from(v: u64) -> Self {
        Self(v.to_string())
    }
}

impl From<&str> for Seed {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// cyrb128 over the UTF-16 code units of `text`.
pub fn cyrb128(text: &str) -> [u32; 4] {
    let mut h1: u32 = 1779033703;
    let mut h2: u32 = 3144134277;
    let mut h3: u32 = 1013904242;
    let mut h4: u32 = 2773480762;

    for k in text.encode_utf16().map(u32::from) {
        h1 = h2 ^ (h1 ^ k).wrapping_mul(597399067);
        h2 = h3 ^ (h2 ^ k).wrapping_mul(2869860233);
        h3 = h4 ^ (h3 ^ k).wrapping_mul(951274213);
        h4 = h1 ^ (h4 ^ k).wrapping_mul(2716044179);
    }

    h1 = (h3 ^ (h1 >> 18)).wrapping_mul(597399067);
    h2 = (h4 ^ (h2 >> 22)).wrapping_mul(2869860233);
    h3 = (h1 ^ (h3 >> 17)).wrapping_mul(951274213);
    h4 = (h2 ^ (h4 >> 19)).wrapping_mul(2716044179);

    [h1 ^ h2 ^ h3 ^ h4, h2 ^ h1, h3 ^ h1, h4 ^ h1]
}

/// Small Fast Counting generator, 32-bit variant.
///
/// Exposed as a [`RngCore`] so the stream draws through `next_u32` and the
/// generator can drive any `rand` API, such as [`Seed::random`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sfc32 {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl Sfc32 {
    pub fn new(state: [u32; 4]) -> Self {
        let [a, b, c, d] = state;
        Self { a, b, c, d }
    }

    fn step(&mut self) -> u32 {
        let mut t = self.a.wrapping_add(self.b);
        self.a = self.b ^ (self.b >> 9);
        self.b = self.c.wrapping_add(self.c << 3);
        self.c = self.c.rotate_left(21);
        self.d = self.d.wrapping_add(1);
        t = t.wrapping_add(self.d);
        self.c = self.c.wrapping_add(t);
        t
    }
}

impl RngCore for Sfc32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.step() as u64;
        let hi = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// The single source of randomness for one engine instance.
#[derive(Clone, Debug)]
pub struct SeededStream {
    rng: Sfc32,
    draws: u64,
}

impl SeededStream {
    pub fn new(seed: &Seed) -> Self {
        Self {
            rng: Sfc32::new(cyrb128(seed.as_str())),
            draws: 0,
        }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.draws += 1;
        self.rng.next_u32() as f64 / 4294967296.0
    }

    pub fn range(&mut self, min: f64, max: f64) -> Result<f64> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(EngineError::InvalidRange { min, max });
        }
        Ok(min + self.next() * (max - min))
    }

    /// Integer in `[min, max]`.
    pub fn int_range(&mut self, min: i64, max: i64) -> Result<i64> {
        let v = self.range(min as f64, max as f64 + 1.0)?;
        Ok((v.floor() as i64).min(max))
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    pub fn pick_one<'a, T>(&mut self, what: &'static str, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(EngineError::EmptyChoice { what });
        }
        let idx = self.int_range(0, items.len() as i64 - 1)? as usize;
        Ok(&items[idx])
    }
}
