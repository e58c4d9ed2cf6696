//!
//! The walks over mask and value.
//!
//! All of them step through the mask tokens and the graphemes of the
//! value in parallel. A slot takes one matching grapheme of the value,
//! a grapheme that doesn't match is dropped and the same slot is tried
//! with the next one. A literal is copied to the output and consumes the
//! value only if the value already contains it at that point.
//!

use crate::text_mask::mask_token::MaskToken;
use crate::text_mask::TextMask;
use crate::{upos_type, FormatResult};
use unicode_segmentation::UnicodeSegmentation;

/// Output buffer.
///
/// `len` counts the emitted graphemes. Adjacent graphemes can merge
/// into one cluster in `buf`, so the final cursor is clamped against
/// `buf` itself.
#[derive(Debug, Default)]
struct Formatted {
    buf: String,
    len: usize,
    /// Graphemes that went into slots.
    raw: String,
}

impl Formatted {
    #[inline]
    fn push(&mut self, g: &str) {
        self.buf.push_str(g);
        self.len += 1;
    }

    #[inline]
    fn push_slot(&mut self, g: &str) {
        self.push(g);
        self.raw.push_str(g);
    }

    fn into_result(self, cursor: usize) -> FormatResult {
        let len = self.buf.graphemes(true).count();
        FormatResult {
            cursor: cursor.min(len) as upos_type,
            value: self.buf,
        }
    }
}

/// Format the complete value without any edit context.
///
/// `cursor` is a position in `value`. It moves right for each literal
/// inserted at or before it, and left for each dropped grapheme before it.
/// Once the value is exhausted, trailing literals are only added while
/// their output position is at or before the requested cursor.
///
/// An empty value stays empty, leading literals are not shown on their own.
pub(crate) fn apply_value(mask: &TextMask, value: &str, cursor: upos_type) -> FormatResult {
    let (out, cursor) = format_value(mask, value, cursor);
    out.into_result(cursor)
}

fn format_value(mask: &TextMask, value: &str, cursor: upos_type) -> (Formatted, usize) {
    let value = value.graphemes(true).collect::<Vec<_>>();
    if value.is_empty() {
        return (Formatted::default(), 0);
    }
    let requested = cursor as usize;
    let mut cursor = requested;

    let mut out = Formatted::default();
    let mut idx = 0;
    let mut tokens = mask.tokens().iter();
    let mut token = tokens.next();
    while let Some(tok) = token {
        match tok {
            MaskToken::Slot(class, _) => {
                let Some(g) = value.get(idx).copied() else {
                    break;
                };
                if class.accepts(g, mask.symbols()) {
                    out.push_slot(g);
                    token = tokens.next();
                } else if idx < requested {
                    cursor = cursor.saturating_sub(1);
                }
                idx += 1;
            }
            MaskToken::Literal(lit) => {
                match value.get(idx).copied() {
                    None => {
                        if out.len > requested {
                            break;
                        }
                        out.push(lit);
                        cursor += 1;
                    }
                    Some(g) if g == lit.as_ref() => {
                        out.push(lit);
                        idx += 1;
                    }
                    Some(_) => {
                        if idx <= requested {
                            cursor += 1;
                        }
                        out.push(lit);
                    }
                }
                token = tokens.next();
            }
        }
    }

    (out, cursor)
}

/// Format after `inserted` graphemes have been inserted at `position`.
///
/// The cursor starts moving when the walk reaches `position` and follows
/// every emitted grapheme until `inserted` graphemes have been accepted.
/// Dropped graphemes don't count. Literals directly after the insertion
/// are passed by the cursor too, and while it moves trailing literals
/// are appended.
///
/// `old_value` is the value before the edit. A literal that's already
/// present in both values is taken over instead of doubled.
pub(crate) fn apply_on_add(
    mask: &TextMask,
    value: &str,
    old_value: &str,
    position: upos_type,
    inserted: upos_type,
) -> FormatResult {
    let value = value.graphemes(true).collect::<Vec<_>>();
    let old_value = old_value.graphemes(true).collect::<Vec<_>>();
    let position = position as usize;
    let inserted = inserted as usize;

    let mut out = Formatted::default();
    let mut idx = 0;
    let mut old_idx = 0;
    let mut started = false;
    let mut moving = false;
    // new graphemes accepted.
    let mut used = 0;
    let mut cursor = None;

    let mut tokens = mask.tokens().iter();
    let mut token = tokens.next();
    while let Some(tok) = token {
        if !started && idx >= position {
            started = true;
            moving = true;
            cursor = Some(out.len);
        }

        match tok {
            MaskToken::Slot(class, _) => {
                if moving && used >= inserted {
                    moving = false;
                }
                let Some(g) = value.get(idx).copied() else {
                    break;
                };
                idx += 1;
                if class.accepts(g, mask.symbols()) {
                    out.push_slot(g);
                    if moving {
                        used += 1;
                        cursor = Some(out.len);
                    } else {
                        old_idx += 1;
                    }
                    token = tokens.next();
                } else if !moving {
                    old_idx += 1;
                }
            }
            MaskToken::Literal(lit) => {
                match value.get(idx).copied() {
                    None => {
                        if !moving {
                            break;
                        }
                        out.push(lit);
                    }
                    Some(g)
                        if g == lit.as_ref() && old_value.get(old_idx).copied() == Some(g) =>
                    {
                        out.push(lit);
                        idx += 1;
                        old_idx += 1;
                    }
                    Some(_) => {
                        out.push(lit);
                    }
                }
                if moving {
                    cursor = Some(out.len);
                }
                token = tokens.next();
            }
        }
    }

    let cursor = cursor.unwrap_or(position);
    out.into_result(cursor)
}

/// Format after some graphemes have been removed at `position`.
///
/// The cursor stays at `position`.
///
/// `value` must be a formatted value with the removal applied. Literals
/// are compared with the value at the same position, a literal that is
/// missing is put back. With a raw value this can't tell a literal from
/// input.
pub(crate) fn apply_on_remove(mask: &TextMask, value: &str, position: upos_type) -> FormatResult {
    let value = value.graphemes(true).collect::<Vec<_>>();

    let mut out = Formatted::default();
    let mut idx = 0;
    let mut tokens = mask.tokens().iter();
    let mut token = tokens.next();
    while let Some(tok) = token {
        match tok {
            MaskToken::Slot(class, _) => {
                let Some(g) = value.get(idx).copied() else {
                    break;
                };
                idx += 1;
                if class.accepts(g, mask.symbols()) {
                    out.push_slot(g);
                    token = tokens.next();
                }
            }
            MaskToken::Literal(lit) => {
                match value.get(idx).copied() {
                    None => {
                        out.push(lit);
                        break;
                    }
                    Some(g) if g == lit.as_ref() => {
                        out.push(lit);
                        idx += 1;
                    }
                    Some(_) => {
                        out.push(lit);
                    }
                }
                token = tokens.next();
            }
        }
    }

    out.into_result(position as usize)
}

/// Replace is a remove followed by an add.
pub(crate) fn apply_on_replace(
    mask: &TextMask,
    value: &str,
    old_value: &str,
    position: upos_type,
    inserted: upos_type,
) -> FormatResult {
    let removed = apply_on_remove(mask, value, position);
    apply_on_add(mask, &removed.value, old_value, position, inserted)
}

/// Extract the graphemes in slot positions.
pub(crate) fn remove_mask(mask: &TextMask, value: &str) -> String {
    let len = value.graphemes(true).count() as upos_type;
    let (formatted, _) = format_value(mask, value, len);
    formatted.raw
}

/// Is this a prefix of a formatted value.
pub(crate) fn is_formatted(mask: &TextMask, value: &str) -> bool {
    let mut graphemes = value.graphemes(true);
    for tok in mask.tokens() {
        let Some(g) = graphemes.next() else {
            return true;
        };
        let ok = match tok {
            MaskToken::Literal(lit) => g == lit.as_ref(),
            MaskToken::Slot(class, _) => class.accepts(g, mask.symbols()),
        };
        if !ok {
            return false;
        }
    }
    graphemes.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPIRY: &str = "{{99}}/{{99}}";

    fn fr(value: &str, cursor: upos_type) -> FormatResult {
        FormatResult {
            value: value.into(),
            cursor,
        }
    }

    #[test]
    fn test_value() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_value(&m, "", 0), fr("", 0));
        assert_eq!(apply_value(&m, "1", 1), fr("1", 1));
        assert_eq!(apply_value(&m, "12", 2), fr("12/", 3));
        assert_eq!(apply_value(&m, "123", 3), fr("12/3", 4));
        assert_eq!(apply_value(&m, "12/3", 4), fr("12/3", 4));
        assert_eq!(apply_value(&m, "123", 1), fr("12/3", 1));
    }

    #[test]
    fn test_value_drops_invalid() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_value(&m, "1x2", 3), fr("12/", 3));
        assert_eq!(apply_value(&m, "1x23", 2), fr("12/3", 1));
        assert_eq!(apply_value(&m, "x", 1), fr("", 0));
        // the trailing literal is not reached by the cursor.
        assert_eq!(apply_value(&m, "12", 1), fr("12", 1));
    }

    #[test]
    fn test_add_typing() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_on_add(&m, "1", "", 0, 1), fr("1", 1));
        assert_eq!(apply_on_add(&m, "12", "1", 1, 1), fr("12/", 3));
        assert_eq!(apply_on_add(&m, "12/3", "12/", 3, 1), fr("12/3", 4));
        assert_eq!(apply_on_add(&m, "12/34", "12/3", 4, 1), fr("12/34", 5));
        assert_eq!(apply_on_add(&m, "12/345", "12/34", 5, 1), fr("12/34", 5));
    }

    #[test]
    fn test_add_invalid() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_on_add(&m, "1x", "1", 1, 1), fr("1", 1));
        assert_eq!(apply_on_add(&m, "x1", "1", 0, 1), fr("1", 1));
        // the cursor stays with the accepted digit.
        assert_eq!(apply_on_add(&m, "12x/34", "12/34", 2, 1), fr("12/34", 4));
    }

    #[test]
    fn test_add_middle() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_on_add(&m, "512/34", "12/34", 0, 1), fr("51/23", 1));
        assert_eq!(apply_on_add(&m, "125/34", "12/34", 2, 1), fr("12/53", 4));
    }

    #[test]
    fn test_add_literal_typed() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_on_add(&m, "1/", "1", 1, 1), fr("1", 1));
        assert_eq!(apply_on_add(&m, "12/", "12", 2, 1), fr("12/", 3));
    }

    #[test]
    fn test_value_empty() {
        let m = TextMask::new("({{999}}) {{999}}");
        assert_eq!(apply_value(&m, "", 0), fr("", 0));
        assert_eq!(apply_value(&m, "", 3), fr("", 0));
        assert_eq!(apply_value(&m, "1", 1), fr("(1", 2));
    }

    #[test]
    fn test_merged_graphemes() {
        // "\r" and "\n" form one grapheme.
        let m = TextMask::new("\r{{*}}");
        assert_eq!(apply_on_add(&m, "\n", "", 0, 1), fr("\r\n", 1));
        assert_eq!(apply_value(&m, "\n", 1), fr("\r\n", 1));
        assert_eq!(remove_mask(&m, "\n"), "\n");
    }

    #[test]
    fn test_add_paste_formatted() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(apply_on_add(&m, "12/34", "", 0, 5), fr("12/34", 5));
    }

    #[test]
    fn test_remove() {
        let m = TextMask::new(EXPIRY);
        // removed the literal, it comes back.
        assert_eq!(apply_on_remove(&m, "12", 2), fr("12/", 2));
        assert_eq!(apply_on_remove(&m, "1/", 1), fr("1", 1));
        assert_eq!(apply_on_remove(&m, "2/34", 0), fr("23/4", 0));
        assert_eq!(apply_on_remove(&m, "1234", 2), fr("12/34", 2));
        assert_eq!(apply_on_remove(&m, "", 0), fr("", 0));
    }

    #[test]
    fn test_replace() {
        let m = TextMask::new("{{9999}} {{9999}}");
        // select "34", type 9
        assert_eq!(
            apply_on_replace(&m, "129 5678", "1234 5678", 2, 1),
            fr("1295 678", 3)
        );
    }

    #[test]
    fn test_remove_mask() {
        let m = TextMask::new(EXPIRY);
        assert_eq!(remove_mask(&m, "12/34"), "1234");
        assert_eq!(remove_mask(&m, "1234"), "1234");
        assert_eq!(remove_mask(&m, "12/"), "12");
        assert_eq!(remove_mask(&m, "a1b2/3"), "123");
    }

    #[test]
    fn test_is_formatted() {
        let m = TextMask::new(EXPIRY);
        assert!(is_formatted(&m, ""));
        assert!(is_formatted(&m, "12/"));
        assert!(is_formatted(&m, "12/34"));
        assert!(!is_formatted(&m, "1234"));
        assert!(!is_formatted(&m, "12/345"));
    }
}
