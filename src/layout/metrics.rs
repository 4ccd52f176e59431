//! Advance widths for the built-in layout engine.
//!
//! Widths are in em units and follow the proportions of a standard
//! sans-serif (Helvetica-class) face closely enough for fitting to behave
//! like it does in a browser. Exact glyph metrics are a host concern.

/// Horizontal advance of `ch` as a fraction of the font size.
pub fn advance_em(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' => 0.222,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'f' | 't' | 'I' | '/' | '\\' | '[' | ']' | '('
        | ')' => 0.278,
        'r' | '-' | '"' | '`' => 0.333,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 0.5,
        'w' | 'C' | 'D' | 'G' | 'H' | 'N' | 'O' | 'Q' | 'R' | 'U' => 0.722,
        'm' | 'M' => 0.833,
        'W' => 0.944,
        '@' => 1.015,
        '0'..='9' => 0.556,
        'a'..='z' => 0.556,
        'A'..='Z' => 0.667,
        '\u{00A0}' => 0.278,
        c if is_wide(c) => 1.0,
        _ => 0.556,
    }
}

/// CJK ideographs, kana, hangul and fullwidth forms take a full em.
fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_and_wide_glyphs() {
        assert!(advance_em('i') < advance_em('n'));
        assert!(advance_em('n') < advance_em('M'));
        assert!((advance_em('中') - 1.0).abs() < 1e-9);
        assert!((advance_em('７') - 1.0).abs() < 1e-9);
    }
}
