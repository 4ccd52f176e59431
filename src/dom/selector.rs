//! Selector subset used to pick fit targets and their inner text element.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! (value optionally quoted), the descendant (whitespace) and child (`>`)
//! combinators, and comma-separated groups.

use thiserror::Error;

use super::{Document, NodeId};

/// Offsets count chars from the start of the selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unexpected character `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("expected a name at offset {offset}")]
    MissingName { offset: usize },
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    #[error("combinator without a following compound selector")]
    DanglingCombinator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

/// A sequence of simple selectors with no combinator in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One comma-separated alternative. `parts[0]` is the leftmost compound and
/// `parts[i].0` is the combinator joining it to `parts[i - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        let mut alternatives = vec![parse_complex(&chars, &mut pos)?];
        // parse_complex stops at the end or at a group separator
        while pos < chars.len() {
            pos += 1;
            alternatives.push(parse_complex(&chars, &mut pos)?);
        }
        Ok(Selector { alternatives })
    }

    /// Whether the element `id` matches any alternative.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        doc.is_element(id)
            && self
                .alternatives
                .iter()
                .any(|complex| matches_from(doc, id, &complex.parts))
    }
}

fn matches_from(doc: &Document, id: NodeId, parts: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = parts.split_last() else {
        return true;
    };
    if !compound_matches(doc, id, compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match combinator {
        Combinator::Child => doc
            .parent(id)
            .is_some_and(|parent| matches_from(doc, parent, rest)),
        Combinator::Descendant => {
            let mut ancestor = doc.parent(id);
            while let Some(candidate) = ancestor {
                if matches_from(doc, candidate, rest) {
                    return true;
                }
                ancestor = doc.parent(candidate);
            }
            false
        }
    }
}

fn compound_matches(doc: &Document, id: NodeId, compound: &Compound) -> bool {
    let Some(el) = doc.element(id) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if !el.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(wanted) = &compound.id {
        if el.attribute("id") != Some(wanted.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| el.has_class(c)) {
        return false;
    }
    compound.attributes.iter().all(|attr| {
        match (el.attribute(&attr.name), &attr.value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        }
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Parse one comma-separated alternative starting at `pos`. Stops at the end
/// of input or on a `,` outside any quoted value, leaving `pos` on it.
fn parse_complex(chars: &[char], pos: &mut usize) -> Result<Complex, SelectorError> {
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        let had_space = skip_whitespace(chars, pos);
        if *pos >= chars.len() || chars[*pos] == ',' {
            break;
        }
        if chars[*pos] == '>' {
            if parts.is_empty() {
                return Err(SelectorError::Unexpected {
                    found: '>',
                    offset: *pos,
                });
            }
            pending = Some(Combinator::Child);
            *pos += 1;
            continue;
        }
        let combinator = match pending.take() {
            Some(c) => c,
            None if parts.is_empty() => Combinator::Descendant,
            None if had_space => Combinator::Descendant,
            None => {
                return Err(SelectorError::Unexpected {
                    found: chars[*pos],
                    offset: *pos,
                })
            }
        };
        let compound = parse_compound(chars, pos)?;
        parts.push((combinator, compound));
    }

    if pending.is_some() {
        return Err(SelectorError::DanglingCombinator);
    }
    if parts.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(Complex { parts })
}

fn skip_whitespace(chars: &[char], pos: &mut usize) -> bool {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
    *pos > start
}

fn read_name(chars: &[char], pos: &mut usize) -> Result<String, SelectorError> {
    let start = *pos;
    while *pos < chars.len() && is_name_char(chars[*pos]) {
        *pos += 1;
    }
    if *pos == start {
        return Err(SelectorError::MissingName { offset: start });
    }
    Ok(chars[start..*pos].iter().collect())
}

fn parse_compound(chars: &[char], pos: &mut usize) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let start = *pos;

    if chars[*pos] == '*' {
        *pos += 1;
    } else if is_name_char(chars[*pos]) {
        compound.tag = Some(read_name(chars, pos)?.to_ascii_lowercase());
    }

    while *pos < chars.len() {
        match chars[*pos] {
            '#' => {
                *pos += 1;
                compound.id = Some(read_name(chars, pos)?);
            }
            '.' => {
                *pos += 1;
                compound.classes.push(read_name(chars, pos)?);
            }
            '[' => {
                *pos += 1;
                compound.attributes.push(parse_attribute(chars, pos)?);
            }
            c if c.is_whitespace() || c == '>' || c == ',' => break,
            c => {
                return Err(SelectorError::Unexpected {
                    found: c,
                    offset: *pos,
                })
            }
        }
    }

    if *pos == start {
        return Err(SelectorError::Unexpected {
            found: chars[start],
            offset: start,
        });
    }
    Ok(compound)
}

fn parse_attribute(
    chars: &[char],
    pos: &mut usize,
) -> Result<AttributeMatch, SelectorError> {
    skip_whitespace(chars, pos);
    let name = read_name(chars, pos)?;
    skip_whitespace(chars, pos);
    let value = match chars.get(*pos) {
        Some(']') => None,
        Some('=') => {
            *pos += 1;
            skip_whitespace(chars, pos);
            let value = match chars.get(*pos) {
                Some(&quote) if quote == '"' || quote == '\'' => {
                    *pos += 1;
                    let start = *pos;
                    while *pos < chars.len() && chars[*pos] != quote {
                        *pos += 1;
                    }
                    if *pos >= chars.len() {
                        return Err(SelectorError::UnterminatedAttribute);
                    }
                    let value: String = chars[start..*pos].iter().collect();
                    *pos += 1;
                    value
                }
                _ => read_name(chars, pos)?,
            };
            skip_whitespace(chars, pos);
            Some(value)
        }
        Some(&found) => {
            return Err(SelectorError::Unexpected {
                found,
                offset: *pos,
            })
        }
        None => return Err(SelectorError::UnterminatedAttribute),
    };
    if chars.get(*pos) != Some(&']') {
        return Err(SelectorError::UnterminatedAttribute);
    }
    *pos += 1;
    Ok(AttributeMatch { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;

    struct Fixture {
        doc: Document,
        outer: NodeId,
        inner: NodeId,
        span: NodeId,
    }

    // html > div#outer.box > div.inner[data-x=1] > span
    fn fixture() -> Fixture {
        let mut doc = Document::new(Viewport::default());
        let outer = doc.create_element("div");
        doc.set_attribute(outer, "id", "outer");
        doc.set_attribute(outer, "class", "box");
        let inner = doc.create_element("div");
        doc.set_attribute(inner, "class", "inner");
        doc.set_attribute(inner, "data-x", "1");
        let span = doc.create_element("span");
        doc.append_child(doc.root(), outer);
        doc.append_child(outer, inner);
        doc.append_child(inner, span);
        Fixture {
            doc,
            outer,
            inner,
            span,
        }
    }

    fn select(f: &Fixture, s: &str) -> Vec<NodeId> {
        f.doc.query_selector_all(&Selector::parse(s).unwrap())
    }

    #[test]
    fn test_simple_selectors() {
        let f = fixture();
        assert_eq!(select(&f, "span"), vec![f.span]);
        assert_eq!(select(&f, "#outer"), vec![f.outer]);
        assert_eq!(select(&f, ".inner"), vec![f.inner]);
        assert_eq!(select(&f, "div.box#outer"), vec![f.outer]);
        assert_eq!(select(&f, "[data-x]"), vec![f.inner]);
        assert_eq!(select(&f, "[data-x='1']"), vec![f.inner]);
        assert!(select(&f, "[data-x=2]").is_empty());
    }

    #[test]
    fn test_combinators() {
        let f = fixture();
        assert_eq!(select(&f, ".box span"), vec![f.span]);
        assert!(select(&f, ".box > span").is_empty());
        assert_eq!(select(&f, ".box > .inner > span"), vec![f.span]);
        assert_eq!(select(&f, "div>span"), vec![f.span]);
    }

    #[test]
    fn test_groups_keep_document_order() {
        let f = fixture();
        assert_eq!(select(&f, "span, #outer"), vec![f.outer, f.span]);
    }

    #[test]
    fn test_comma_inside_quoted_value() {
        let mut f = fixture();
        f.doc.set_attribute(f.inner, "title", "a,b");
        assert_eq!(select(&f, r#"[title="a,b"]"#), vec![f.inner]);
        assert_eq!(select(&f, r#"span, [title='a,b']"#), vec![f.inner, f.span]);
        assert!(select(&f, r#"[title="a"]"#).is_empty());
    }

    #[test]
    fn test_empty_group_is_rejected() {
        assert_eq!(Selector::parse("span,"), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("span,,div"), Err(SelectorError::Empty));
    }

    #[test]
    fn test_error_offsets_count_chars() {
        assert_eq!(
            Selector::parse("p, é!"),
            Err(SelectorError::Unexpected {
                found: '!',
                offset: 4
            })
        );
        assert_eq!(
            Selector::parse("ü.#x"),
            Err(SelectorError::MissingName { offset: 2 })
        );
    }

    #[test]
    fn test_universal_matches_every_element() {
        let f = fixture();
        assert_eq!(select(&f, "*").len(), 4);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("div >"), Err(SelectorError::DanglingCombinator));
        assert_eq!(
            Selector::parse("[data-x"),
            Err(SelectorError::UnterminatedAttribute)
        );
        assert!(matches!(
            Selector::parse("div!"),
            Err(SelectorError::Unexpected { found: '!', .. })
        ));
        assert!(matches!(
            Selector::parse("> span"),
            Err(SelectorError::Unexpected { found: '>', .. })
        ));
    }
}
