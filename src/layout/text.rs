//! # Line Breaking
//!
//! Greedy UAX#14 line breaking for the built-in engine. Unlike a PDF
//! typesetter, a word that is wider than the line is not split: it overflows,
//! because that is what a browser does and the fitter relies on seeing the
//! overflow to shrink the text.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use super::metrics::advance_em;

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBox {
    /// Char range into the collapsed text.
    pub start: usize,
    pub end: usize,
    /// Visible width, trailing spaces excluded.
    pub width: f64,
}

/// Collapse runs of whitespace to a single space and trim both ends
/// (`white-space: normal` processing).
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Break opportunities indexed by char position: entry `i` is the
/// opportunity *before* char `i`. Index 0 is always `None`.
fn break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        // The final mandatory break at end of text carries no information.
        if char_idx > 0 && char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }
    result
}

/// Lay `text` out into lines no wider than `max_width` where break
/// opportunities allow. `None` means no wrapping.
///
/// Every char advances by `advance_em(ch) * font_size + letter_spacing`.
pub fn break_lines(
    text: &str,
    font_size: f64,
    letter_spacing: f64,
    max_width: Option<f64>,
) -> Vec<LineBox> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    let widths: Vec<f64> = chars
        .iter()
        .map(|&ch| advance_em(ch) * font_size + letter_spacing)
        .collect();

    let Some(max_width) = max_width else {
        return vec![make_line(&chars, &widths, 0, chars.len())];
    };

    let opportunities = break_opportunities(text);
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;
    let mut last_break: Option<usize> = None;

    for (i, &ch) in chars.iter().enumerate() {
        if i > line_start {
            match opportunities[i] {
                Some(BreakOpportunity::Mandatory) => {
                    lines.push(make_line(&chars, &widths, line_start, i));
                    line_start = i;
                    line_width = 0.0;
                    last_break = None;
                }
                Some(BreakOpportunity::Allowed) => last_break = Some(i),
                None => {}
            }
        }

        line_width += widths[i];

        // Spaces hang past the line end and never force a break.
        if ch.is_whitespace() || line_width <= max_width {
            continue;
        }
        if let Some(bp) = last_break.filter(|&bp| bp > line_start) {
            lines.push(make_line(&chars, &widths, line_start, bp));
            line_start = bp;
            line_width = widths[bp..=i].iter().sum();
            last_break = None;
        }
    }

    lines.push(make_line(&chars, &widths, line_start, chars.len()));
    lines
}

fn make_line(chars: &[char], widths: &[f64], start: usize, end: usize) -> LineBox {
    let mut visible_end = end;
    while visible_end > start && chars[visible_end - 1].is_whitespace() {
        visible_end -= 1;
    }
    LineBox {
        start,
        end,
        width: widths[start..visible_end].iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let lines = break_lines("Hello", 12.0, 0.0, Some(200.0));
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].start, lines[0].end), (0, 5));
    }

    #[test]
    fn test_line_break_at_space() {
        let lines = break_lines("Hello World", 12.0, 0.0, Some(40.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, 6);
        // trailing space on the first line is not counted
        let hello: f64 = "Hello".chars().map(|c| advance_em(c) * 12.0).sum();
        assert!((lines[0].width - hello).abs() < 1e-9);
    }

    #[test]
    fn test_long_word_overflows_instead_of_splitting() {
        let lines = break_lines("Unfittable", 10.0, 0.0, Some(10.0));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].width > 10.0);
    }

    #[test]
    fn test_no_wrap_keeps_one_line() {
        let lines = break_lines("Unfittable long text", 10.0, 0.0, None);
        assert_eq!(lines.len(), 1);
        let wrapped = break_lines("Unfittable long text", 10.0, 0.0, Some(10.0));
        assert_eq!(wrapped.len(), 3);
    }

    #[test]
    fn test_letter_spacing_widens_every_char() {
        let plain = break_lines("abc", 10.0, 0.0, None);
        let spaced = break_lines("abc", 10.0, 2.0, None);
        assert!((spaced[0].width - plain[0].width - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(break_lines("", 12.0, 0.0, Some(100.0)).is_empty());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Hello \n\t World  "), "Hello World");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
