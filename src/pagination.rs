//! Splitting ordered sequences into fixed-size pages.

use crate::error::{BotError, Result};

/// Split `items` into consecutive pages of `page_size` elements.
///
/// Every page is full except possibly the last, which holds the remainder.
/// Empty input yields no pages at all.
///
/// # Errors
///
/// Returns [`BotError::InvalidPageSize`] if `page_size` is zero.
pub fn paginate<T>(items: &[T], page_size: usize) -> Result<Vec<&[T]>> {
    if page_size == 0 {
        return Err(BotError::InvalidPageSize);
    }
    Ok(items.chunks(page_size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_pages() {
        let items: [u64; 0] = [];
        assert!(paginate(&items, 4).unwrap().is_empty());
    }

    #[test]
    fn exact_multiple_fills_every_page() {
        let items: Vec<u32> = (0..8).collect();
        let pages = paginate(&items, 4).unwrap();
        assert_eq!(pages, vec![&[0, 1, 2, 3][..], &[4, 5, 6, 7][..]]);
    }

    #[test]
    fn remainder_goes_to_last_page() {
        let items: Vec<u32> = (0..9).collect();
        let pages = paginate(&items, 4).unwrap();
        let sizes: Vec<usize> = pages.iter().map(|page| page.len()).collect();
        assert_eq!(sizes, vec![4, 4, 1]);
        assert_eq!(pages[2], &[8]);
    }

    #[test]
    fn page_larger_than_input() {
        let items = ["a", "b"];
        assert_eq!(paginate(&items, 10).unwrap(), vec![&items[..]]);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(matches!(
            paginate(&[1, 2, 3], 0),
            Err(BotError::InvalidPageSize)
        ));
    }
}
