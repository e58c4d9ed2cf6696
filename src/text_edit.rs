//!
//! Describes one edit of a text field.
//!

use crate::{ipos_type, upos_type, MaskError};

/// Kind of edit, derived from the removed/inserted counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Only inserted text.
    Added,
    /// Only removed text.
    Removed,
    /// Both, or neither.
    Replaced,
}

impl EditKind {
    /// Classify an edit.
    ///
    /// # Errors
    /// Negative counts are rejected with [MaskError::InvalidArgument].
    pub fn classify(removed: ipos_type, inserted: ipos_type) -> Result<EditKind, MaskError> {
        if removed < 0 || inserted < 0 {
            return Err(MaskError::InvalidArgument(format!(
                "negative edit count: removed={} inserted={}",
                removed, inserted
            )));
        }
        Ok(if inserted > 0 && removed == 0 {
            EditKind::Added
        } else if inserted == 0 && removed > 0 {
            EditKind::Removed
        } else {
            EditKind::Replaced
        })
    }
}

/// One edit as reported by a text field.
///
/// Both values are the complete field content before and after the edit.
/// `position` is the grapheme index where the edit starts, `removed`
/// graphemes were replaced by `inserted` new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit<'a> {
    pub new_value: &'a str,
    pub old_value: &'a str,
    pub position: upos_type,
    pub removed: ipos_type,
    pub inserted: ipos_type,
}

impl<'a> TextEdit<'a> {
    pub fn new(
        new_value: &'a str,
        old_value: &'a str,
        position: upos_type,
        removed: ipos_type,
        inserted: ipos_type,
    ) -> Self {
        Self {
            new_value,
            old_value,
            position,
            removed,
            inserted,
        }
    }

    /// Only inserted graphemes.
    pub fn insert(
        new_value: &'a str,
        old_value: &'a str,
        position: upos_type,
        inserted: ipos_type,
    ) -> Self {
        Self::new(new_value, old_value, position, 0, inserted)
    }

    /// Only removed graphemes.
    pub fn remove(
        new_value: &'a str,
        old_value: &'a str,
        position: upos_type,
        removed: ipos_type,
    ) -> Self {
        Self::new(new_value, old_value, position, removed, 0)
    }

    /// Classify this edit.
    pub fn kind(&self) -> Result<EditKind, MaskError> {
        EditKind::classify(self.removed, self.inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EditKind::classify(0, 1), Ok(EditKind::Added));
        assert_eq!(EditKind::classify(3, 0), Ok(EditKind::Removed));
        assert_eq!(EditKind::classify(2, 1), Ok(EditKind::Replaced));
        assert_eq!(EditKind::classify(0, 0), Ok(EditKind::Replaced));
    }

    #[test]
    fn test_classify_negative() {
        assert!(matches!(
            EditKind::classify(-1, 0),
            Err(MaskError::InvalidArgument(_))
        ));
        assert!(matches!(
            EditKind::classify(0, -1),
            Err(MaskError::InvalidArgument(_))
        ));
        assert!(matches!(
            EditKind::classify(-1, -1),
            Err(MaskError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_edit_kind() {
        assert_eq!(TextEdit::insert("12", "1", 1, 1).kind(), Ok(EditKind::Added));
        assert_eq!(TextEdit::remove("1", "12", 1, 1).kind(), Ok(EditKind::Removed));
    }
}
