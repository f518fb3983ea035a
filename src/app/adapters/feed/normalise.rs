//! Time text normalisation applied by feed adapters
//!
//! Feeds mark half minutes with a fraction glyph in place of a final digit
//! fraction, and some sources deliver the glyph mis-decoded. Adapters replace
//! these with a decimal suffix so that time parsing only ever sees digits.

use crate::constants::FRACTION_GLYPHS;

/// Replace fraction glyphs with decimal suffixes and trim surrounding whitespace
///
/// ```rust
/// use rail_punctuality::app::adapters::feed::normalise::normalise_time_text;
///
/// assert_eq!(normalise_time_text("0830½"), "0830.5");
/// assert_eq!(normalise_time_text(" 0830 "), "0830");
/// ```
pub fn normalise_time_text(text: &str) -> String {
    let mut normalised = text.trim().to_string();
    for (glyph, decimal) in FRACTION_GLYPHS {
        if normalised.contains(glyph) {
            normalised = normalised.replace(glyph, decimal);
        }
    }
    normalised
}

/// Normalise optional time text, treating blank text as absent
pub fn normalise_optional_time_text(text: Option<&str>) -> Option<String> {
    text.map(normalise_time_text)
        .filter(|normalised| !normalised.is_empty())
}
