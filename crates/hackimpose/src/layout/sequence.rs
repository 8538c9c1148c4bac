//! Logical page sequence
//!
//! The folding plan works on logical positions. Usually logical page `i` is
//! source page `i`; keeping the last N pages in place (a back cover, say)
//! pads the sequence to whole signatures with blanks inserted before them.

use crate::constants::PAGES_PER_SIGNATURE;
use crate::types::{ImposeError, Result};

/// Source page (or blank) for every logical position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSequence {
    slots: Vec<Option<usize>>,
}

impl PageSequence {
    /// Sequence for `source_pages` pages keeping the last `keep_last` at the end
    pub fn build(source_pages: usize, keep_last: usize) -> Result<Self> {
        if keep_last > source_pages {
            return Err(ImposeError::Config(format!(
                "Cannot keep {} last pages of a {} page document",
                keep_last, source_pages
            )));
        }

        if keep_last == 0 {
            return Ok(Self::identity(source_pages));
        }

        let padded = source_pages.div_ceil(PAGES_PER_SIGNATURE) * PAGES_PER_SIGNATURE;
        let blanks = padded - source_pages;
        let body = source_pages - keep_last;

        let slots = (0..body)
            .map(Some)
            .chain(std::iter::repeat_n(None, blanks))
            .chain((body..source_pages).map(Some))
            .collect();

        Ok(Self { slots })
    }

    /// Logical page `i` is source page `i`
    pub fn identity(source_pages: usize) -> Self {
        Self {
            slots: (0..source_pages).map(Some).collect(),
        }
    }

    /// Number of logical positions, blanks included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Source page at logical position `index`, `None` for a blank
    pub fn source_page(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied().flatten()
    }

    pub fn blank_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// `(logical index, source page)` for every non-blank position
    pub fn pages(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(logical, source)| source.map(|s| (logical, s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_without_keep_last() {
        let seq = PageSequence::build(5, 0).unwrap();
        assert_eq!(seq.len(), 5);
        assert_eq!(seq.blank_count(), 0);
        assert_eq!(seq.source_page(3), Some(3));
    }

    #[test]
    fn test_keep_last_moves_back_cover_to_the_end() {
        let seq = PageSequence::build(10, 1).unwrap();
        assert_eq!(seq.len(), 16);
        assert_eq!(seq.blank_count(), 6);
        assert_eq!(seq.source_page(8), Some(8));
        assert_eq!(seq.source_page(9), None);
        assert_eq!(seq.source_page(14), None);
        assert_eq!(seq.source_page(15), Some(9));
    }

    #[test]
    fn test_keep_last_on_full_signature_adds_nothing() {
        let seq = PageSequence::build(32, 2).unwrap();
        assert_eq!(seq, PageSequence::identity(32));
    }

    #[test]
    fn test_keep_last_larger_than_document() {
        assert!(matches!(
            PageSequence::build(3, 4),
            Err(ImposeError::Config(_))
        ));
    }

    #[test]
    fn test_pages_skips_blanks() {
        let seq = PageSequence::build(3, 1).unwrap();
        let pages: Vec<_> = seq.pages().collect();
        assert_eq!(pages, vec![(0, 0), (1, 1), (15, 2)]);
    }
}
