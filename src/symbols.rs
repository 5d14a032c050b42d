// Copyright (c) 2026 rezky_nightky

use crate::error::Result;
use crate::stream::SeededStream;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolCategory {
    Alphanumeric,
    Punctuation,
    Special,
    VisualPatterns,
    CodeFragments,
}

/// Categories a particle may draw its glyph from.
pub const PARTICLE_CATEGORIES: [SymbolCategory; 4] = [
    SymbolCategory::Alphanumeric,
    SymbolCategory::Punctuation,
    SymbolCategory::Special,
    SymbolCategory::VisualPatterns,
];

const ALPHANUMERIC: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F", "G", "H", "I",
    "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "a", "b",
    "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u",
    "v", "w", "x", "y", "z",
];

const PUNCTUATION: &[&str] = &[
    "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/", ":", ";", "<", "=",
    ">", "?", "[", "]", "^", "_", "`", "{", "|", "}", "~",
];

const SPECIAL: &[&str] = &["∞"];

const VISUAL_PATTERNS: &[&str] = &[
    ")),", ">>>", "]),", "(...", "===", "[[.", "]],", "`${", "!==", ")))",
];

const CODE_FRAGMENTS: &[&str] = &[
    "function()", "=>", "class", "const", "let", "var", "for", "while", "if", "else", "return",
    "this", "new", "import", "export", "default", "try", "catch",
];

impl SymbolCategory {
    pub fn name(self) -> &'static str {
        match self {
            SymbolCategory::Alphanumeric => "alphanumeric",
            SymbolCategory::Punctuation => "punctuation",
            SymbolCategory::Special => "special",
            SymbolCategory::VisualPatterns => "visualPatterns",
            SymbolCategory::CodeFragments => "codeFragments",
        }
    }

    pub fn glyphs(self) -> &'static [&'static str] {
        match self {
            SymbolCategory::Alphanumeric => ALPHANUMERIC,
            SymbolCategory::Punctuation => PUNCTUATION,
            SymbolCategory::Special => SPECIAL,
            SymbolCategory::VisualPatterns => VISUAL_PATTERNS,
            SymbolCategory::CodeFragments => CODE_FRAGMENTS,
        }
    }
}

/// One glyph from `category`. One draw.
pub fn pick_symbol(stream: &mut SeededStream, category: SymbolCategory) -> Result<&'static str> {
    stream
        .pick_one(category.name(), category.glyphs())
        .copied()
}

/// A category from `PARTICLE_CATEGORIES`, then a glyph from it. Two draws.
pub fn pick_particle_symbol(stream: &mut SeededStream) -> Result<&'static str> {
    let category = *stream.pick_one("symbol categories", &PARTICLE_CATEGORIES)?;
    pick_symbol(stream, category)
}
