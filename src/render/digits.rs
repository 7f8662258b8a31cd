//! Score glyph layout
//!
//! The digit sheets are fixed-pitch except for "1", which is narrower; the
//! layout mirrors the art's kerning so centered and right-aligned scores
//! land where the panel expects them.

/// One digit sheet's metrics
#[derive(Debug, Clone, Copy)]
pub struct GlyphSet {
    pub advance: i32,
    /// Advance used for the narrow "1" glyph
    pub narrow: i32,
    pub height: i32,
}

/// The big in-round score glyphs
pub const BIG: GlyphSet = GlyphSet {
    advance: 24,
    narrow: 16,
    height: 36,
};

/// The small results-panel glyphs
pub const SMALL: GlyphSet = GlyphSet {
    advance: 16,
    narrow: 12,
    height: 20,
};

impl GlyphSet {
    fn advance_for(&self, digit: u8) -> i32 {
        if digit == 1 { self.narrow } else { self.advance }
    }
}

/// Decimal digits of `value`, most significant first
pub fn digits(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(4);
    let mut v = value;
    loop {
        out.push((v % 10) as u8);
        v /= 10;
        if v == 0 {
            break;
        }
    }
    out.reverse();
    out
}

/// Rendered width of `value` in `set`
pub fn width(value: u32, set: &GlyphSet) -> i32 {
    digits(value).iter().map(|d| set.advance_for(*d)).sum()
}

/// Per-digit x offsets for drawing `value` with its left edge at `origin_x`
pub fn layout(value: u32, set: &GlyphSet, origin_x: i32) -> Vec<(u8, i32)> {
    let mut x = origin_x;
    digits(value)
        .into_iter()
        .map(|d| {
            let at = (d, x);
            x += set.advance_for(d);
            at
        })
        .collect()
}
