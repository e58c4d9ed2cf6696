#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod text_edit;
pub mod text_mask;

pub use text_edit::{EditKind, TextEdit};
pub use text_mask::mask_token::{CharClass, MaskSymbols, MaskToken};
pub use text_mask::{
    apply_mask, apply_mask_cursor, apply_mask_edit, relax_mask, remove_mask, TextMask,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Invalid argument.
    /// Negative counts for an edit.
    InvalidArgument(String),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

/// Grapheme position/count type.
#[allow(non_camel_case_types)]
pub type upos_type = u32;
/// Signed count type.
#[allow(non_camel_case_types)]
pub type ipos_type = i32;

/// Formatted value and the new cursor position.
///
/// The cursor is always within `0..=value.len()`, counted in graphemes.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct FormatResult {
    pub value: String,
    pub cursor: upos_type,
}

impl FormatResult {
    pub fn new(value: impl Into<String>, cursor: upos_type) -> Self {
        Self {
            value: value.into(),
            cursor,
        }
    }
}

impl Debug for FormatResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{}", self.value, self.cursor)
    }
}
