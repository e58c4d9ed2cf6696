//! Input masks for structured text.
//!
//! A mask is a string of literals and placeholder groups.
//! Groups are enclosed in doubled markers, `{{` and `}}` by default.
//!
//! * `9`: a digit, also accepts the masked digit `X`.
//! * `a`: a lowercase letter
//! * `A`: an uppercase letter
//! * `*`: anything
//!
//! Everything outside a group is copied to the output as is.
//!
//! ```rust
//! use rat_mask::text_mask::TextMask;
//!
//! let expiry = TextMask::new("{{99}}/{{99}}");
//! assert_eq!(expiry.apply("1"), "1");
//! assert_eq!(expiry.apply("12"), "12/");
//! assert_eq!(expiry.apply("1234"), "12/34");
//! assert_eq!(expiry.unmask("12/34"), "1234");
//! ```
//!
//! The free functions parse the mask for every call and follow the
//! convention that a missing mask or value gives a missing result.
//! A [TextMask] parses once and can be reused.
//!
//! Positions and lengths count graphemes.
//!

use crate::text_edit::{EditKind, TextEdit};
use crate::{ipos_type, upos_type, FormatResult, MaskError};
use log::debug;
use unicode_segmentation::UnicodeSegmentation;

mod mask_op;
pub mod mask_token;

use mask_token::{parse_mask, write_mask, MaskSymbols, MaskToken};

/// Parsed mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMask {
    mask: Box<str>,
    sym: MaskSymbols,
    tokens: Vec<MaskToken>,
}

impl Default for TextMask {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextMask {
    /// Parse with the default symbols.
    pub fn new(mask: &str) -> Self {
        Self::with_symbols(mask, MaskSymbols::default())
    }

    /// Parse with other symbols.
    pub fn with_symbols(mask: &str, sym: MaskSymbols) -> Self {
        Self {
            mask: Box::from(mask),
            tokens: parse_mask(mask, &sym),
            sym,
        }
    }

    pub fn symbols(&self) -> &MaskSymbols {
        &self.sym
    }

    /// Parsed mask.
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Mask as given.
    ///
    /// Writing the tokens back wouldn't do for malformed masks,
    /// a slot nested too deep can't be told apart from a regular one.
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Length of a completely formatted value.
    pub fn len(&self) -> upos_type {
        self.tokens.len() as upos_type
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of placeholders.
    pub fn max_raw_len(&self) -> upos_type {
        self.tokens.iter().filter(|v| v.is_slot()).count() as upos_type
    }

    /// Format the complete value.
    pub fn apply(&self, value: &str) -> String {
        let len = value.graphemes(true).count() as upos_type;
        mask_op::apply_value(self, value, len).value
    }

    /// Format the complete value and map the cursor.
    pub fn apply_cursor(&self, value: &str, cursor: upos_type) -> FormatResult {
        mask_op::apply_value(self, value, cursor)
    }

    /// Format the value after an edit.
    ///
    /// The old value is expected to be formatted with this mask.
    /// Replacing and removing relies on it to find the literals.
    ///
    /// # Errors
    /// Negative counts in the edit give [MaskError::InvalidArgument].
    pub fn apply_edit(&self, edit: &TextEdit<'_>) -> Result<FormatResult, MaskError> {
        let kind = edit.kind()?;
        debug!(
            "mask edit {:?} at {} -{} +{}",
            kind, edit.position, edit.removed, edit.inserted
        );

        if kind != EditKind::Added && !self.is_formatted(edit.old_value) {
            debug!(
                "old value {:?} is not formatted with mask {:?}",
                edit.old_value,
                self.mask()
            );
        }

        let inserted = edit.inserted as upos_type;
        Ok(match kind {
            EditKind::Added => mask_op::apply_on_add(
                self,
                edit.new_value,
                edit.old_value,
                edit.position,
                inserted,
            ),
            EditKind::Removed => mask_op::apply_on_remove(self, edit.new_value, edit.position),
            EditKind::Replaced => mask_op::apply_on_replace(
                self,
                edit.new_value,
                edit.old_value,
                edit.position,
                inserted,
            ),
        })
    }

    /// Strip all literals. Accepts formatted and raw values.
    pub fn unmask(&self, value: &str) -> String {
        mask_op::remove_mask(self, value)
    }

    /// Mask that shows the structure but not the character classes.
    /// Placeholders become wildcards and literals blanks.
    pub fn relaxed(&self) -> String {
        let wildcard = self.sym.wildcard.to_string();
        let blank = self.sym.relaxed_literal.to_string();
        write_mask(
            &self.tokens,
            &self.sym,
            |_| wildcard.clone(),
            |_| blank.clone(),
        )
    }

    /// Value is a formatted value or a prefix of one.
    pub fn is_formatted(&self, value: &str) -> bool {
        mask_op::is_formatted(self, value)
    }

    /// All placeholders are filled.
    pub fn is_complete(&self, value: &str) -> bool {
        let raw = self.unmask(value);
        raw.graphemes(true).count() == self.max_raw_len() as usize
    }
}

/// Format a complete value.
///
/// Returns None if mask or value is None.
pub fn apply_mask(mask: Option<&str>, value: Option<&str>) -> Option<String> {
    let (mask, value) = (mask?, value?);
    Some(TextMask::new(mask).apply(value))
}

/// Format a complete value and map the cursor.
///
/// Returns None if mask or value is None.
pub fn apply_mask_cursor(
    mask: Option<&str>,
    value: Option<&str>,
    cursor: upos_type,
) -> Option<FormatResult> {
    let (mask, value) = (mask?, value?);
    Some(TextMask::new(mask).apply_cursor(value, cursor))
}

/// Format the value after an edit of a text field.
///
/// `new_value` and `old_value` are the field contents after and before the edit,
/// `position` is where the edit starts. `removed` graphemes have been replaced
/// by `inserted` ones.
///
/// Returns None if mask or one of the values is None.
///
/// # Errors
/// Negative counts are an [MaskError::InvalidArgument].
pub fn apply_mask_edit(
    mask: Option<&str>,
    new_value: Option<&str>,
    old_value: Option<&str>,
    position: upos_type,
    removed: ipos_type,
    inserted: ipos_type,
) -> Result<Option<FormatResult>, MaskError> {
    EditKind::classify(removed, inserted)?;
    let (Some(mask), Some(new_value), Some(old_value)) = (mask, new_value, old_value) else {
        return Ok(None);
    };
    let edit = TextEdit::new(new_value, old_value, position, removed, inserted);
    TextMask::new(mask).apply_edit(&edit).map(Some)
}

/// Strip the mask from a value.
///
/// Returns None if mask or value is None.
pub fn remove_mask(mask: Option<&str>, value: Option<&str>) -> Option<String> {
    let (mask, value) = (mask?, value?);
    Some(TextMask::new(mask).unmask(value))
}

/// Display-only version of the mask.
///
/// Returns None if mask is None.
pub fn relax_mask(mask: Option<&str>) -> Option<String> {
    Some(TextMask::new(mask?).relaxed())
}
