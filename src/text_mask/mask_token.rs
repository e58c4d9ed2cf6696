use log::debug;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Characters that make up the mask syntax.
///
/// The default is
/// * `{{` and `}}` open and close a placeholder group.
/// * `9`: digit, also accepts the masked digit `X`.
/// * `a`: lowercase letter a-z
/// * `A`: uppercase letter A-Z
/// * `*`: anything.
///
/// Everything outside a group is a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskSymbols {
    /// Group open marker. Must be doubled.
    pub open: char,
    /// Group close marker. Must be doubled.
    pub close: char,
    pub digit: char,
    pub lower: char,
    pub upper: char,
    pub wildcard: char,
    /// An already redacted digit. Accepted by the digit class.
    pub masked_digit: char,
    /// Replacement for literals in a relaxed mask.
    pub relaxed_literal: char,
}

impl Default for MaskSymbols {
    fn default() -> Self {
        Self {
            open: '{',
            close: '}',
            digit: '9',
            lower: 'a',
            upper: 'A',
            wildcard: '*',
            masked_digit: 'X',
            relaxed_literal: ' ',
        }
    }
}

impl MaskSymbols {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Character class of one placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// 0-9 or the masked digit.
    Digit,
    /// a-z
    Lower,
    /// A-Z
    Upper,
    /// Anything
    Wildcard,
    /// Unknown symbol. Accepts nothing.
    None,
}

impl CharClass {
    /// Class for a placeholder symbol.
    pub fn from_symbol(symbol: &str, sym: &MaskSymbols) -> CharClass {
        match single_char(symbol) {
            Some(c) if c == sym.digit => CharClass::Digit,
            Some(c) if c == sym.lower => CharClass::Lower,
            Some(c) if c == sym.upper => CharClass::Upper,
            Some(c) if c == sym.wildcard => CharClass::Wildcard,
            _ => CharClass::None,
        }
    }

    /// Does this class accept the grapheme.
    #[inline]
    pub fn accepts(&self, g: &str, sym: &MaskSymbols) -> bool {
        // multi-char graphemes only match the wildcard.
        let Some(c) = single_char(g) else {
            return *self == CharClass::Wildcard;
        };
        match self {
            CharClass::Digit => c.is_ascii_digit() || c == sym.masked_digit,
            CharClass::Lower => c.is_ascii_lowercase(),
            CharClass::Upper => c.is_ascii_uppercase(),
            CharClass::Wildcard => true,
            CharClass::None => false,
        }
    }
}

/// One position of the parsed mask.
#[allow(variant_size_differences)]
#[derive(Clone, PartialEq, Eq)]
pub enum MaskToken {
    /// Copied verbatim.
    Literal(Box<str>),
    /// Takes one grapheme of the value.
    /// Keeps the original symbol for display.
    Slot(CharClass, Box<str>),
}

impl MaskToken {
    #[inline]
    pub fn is_slot(&self) -> bool {
        matches!(self, MaskToken::Slot(_, _))
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, MaskToken::Literal(_))
    }
}

impl Debug for MaskToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskToken::Literal(s) => write!(f, "\\{}", s),
            MaskToken::Slot(c, s) => write!(f, "{}:{:?}", s, c),
        }
    }
}

impl Display for MaskToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskToken::Literal(s) => write!(f, "{}", s),
            MaskToken::Slot(_, s) => write!(f, "{}", s),
        }
    }
}

/// The only char of a grapheme.
#[inline]
pub(crate) fn single_char(g: &str) -> Option<char> {
    let mut it = g.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Split the mask into literals and slots.
///
/// Each open marker increments a depth, each close marker decrements it.
/// Only depth 2 is inside a placeholder group. A marker that isn't part of
/// a doubled pair still counts, but is kept as a literal too.
/// Anything nested deeper than 2 can't be matched.
pub(crate) fn parse_mask(mask_str: &str, sym: &MaskSymbols) -> Vec<MaskToken> {
    let graphemes = mask_str.graphemes(true).collect::<Vec<_>>();

    let mut out = Vec::with_capacity(graphemes.len());
    let mut depth = 0i32;
    for (idx, g) in graphemes.iter().copied().enumerate() {
        let step = match single_char(g) {
            Some(c) if c == sym.open => 1,
            Some(c) if c == sym.close => -1,
            _ => 0,
        };

        if step != 0 {
            depth += step;

            let doubled = (idx > 0 && graphemes[idx - 1] == g) || graphemes.get(idx + 1) == Some(&g);
            if !doubled {
                out.push(MaskToken::Literal(Box::from(g)));
            }
            continue;
        }

        let tok = match depth {
            2 => MaskToken::Slot(CharClass::from_symbol(g, sym), Box::from(g)),
            d if d > 2 => MaskToken::Slot(CharClass::None, Box::from(g)),
            _ => MaskToken::Literal(Box::from(g)),
        };
        out.push(tok);
    }

    if depth != 0 {
        debug!("unbalanced group markers in mask {:?}: depth {}", mask_str, depth);
    }

    out
}

/// Write the tokens back as a mask.
/// Consecutive slots share one group.
pub(crate) fn write_mask(
    tokens: &[MaskToken],
    sym: &MaskSymbols,
    slot: impl Fn(&str) -> String,
    literal: impl Fn(&str) -> String,
) -> String {
    let mut buf = String::new();
    let mut in_group = false;
    for tok in tokens {
        match tok {
            MaskToken::Slot(_, s) => {
                if !in_group {
                    buf.push(sym.open);
                    buf.push(sym.open);
                    in_group = true;
                }
                buf.push_str(&slot(s));
            }
            MaskToken::Literal(s) => {
                if in_group {
                    buf.push(sym.close);
                    buf.push(sym.close);
                    in_group = false;
                }
                buf.push_str(&literal(s));
            }
        }
    }
    if in_group {
        buf.push(sym.close);
        buf.push(sym.close);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(mask: &str) -> Vec<Option<CharClass>> {
        parse_mask(mask, &MaskSymbols::default())
            .into_iter()
            .map(|v| match v {
                MaskToken::Literal(_) => None,
                MaskToken::Slot(c, _) => Some(c),
            })
            .collect()
    }

    #[test]
    fn test_parse_groups() {
        assert_eq!(
            classes("{{99}}/{{aA*}}"),
            vec![
                Some(CharClass::Digit),
                Some(CharClass::Digit),
                None,
                Some(CharClass::Lower),
                Some(CharClass::Upper),
                Some(CharClass::Wildcard),
            ]
        );
        assert_eq!(classes("{{9q}}"), vec![Some(CharClass::Digit), Some(CharClass::None)]);
        assert_eq!(classes(""), vec![]);
    }

    #[test]
    fn test_parse_lone_marker() {
        // a single marker is a literal, but still counts.
        let t = parse_mask("{9}", &MaskSymbols::default());
        assert_eq!(t.len(), 3);
        assert!(t.iter().all(|v| v.is_literal()));

        let t = parse_mask("{{9}x", &MaskSymbols::default());
        assert_eq!(t.len(), 3);
        assert!(t[0].is_slot());
        assert_eq!(t[1], MaskToken::Literal(Box::from("}")));
        assert_eq!(t[2], MaskToken::Literal(Box::from("x")));
    }

    #[test]
    fn test_parse_nested() {
        assert_eq!(classes("{{{9}}}"), vec![Some(CharClass::None)]);
    }

    #[test]
    fn test_accepts() {
        let sym = MaskSymbols::default();
        assert!(CharClass::Digit.accepts("7", &sym));
        assert!(CharClass::Digit.accepts("X", &sym));
        assert!(!CharClass::Digit.accepts("x", &sym));
        assert!(!CharClass::Digit.accepts("٣", &sym));
        assert!(CharClass::Lower.accepts("q", &sym));
        assert!(!CharClass::Lower.accepts("Q", &sym));
        assert!(!CharClass::Lower.accepts("ä", &sym));
        assert!(CharClass::Upper.accepts("Q", &sym));
        assert!(!CharClass::Upper.accepts("q", &sym));
        assert!(CharClass::Wildcard.accepts("ü", &sym));
        assert!(CharClass::Wildcard.accepts(" ", &sym));
        assert!(!CharClass::None.accepts("9", &sym));
    }

    #[test]
    fn test_write_mask() {
        let sym = MaskSymbols::default();
        let t = parse_mask("+{{99}} ({{999}})", &sym);
        assert_eq!(
            write_mask(&t, &sym, |v| v.into(), |v| v.into()),
            "+{{99}} ({{999}})"
        );
    }
}
