//! Fixed-size pagination over a filtered result list

use std::ops::Range;

/// Records shown per page
pub const PAGE_SIZE: usize = 50;

/// One page of a result list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, clamped into `[1, total_pages]`
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl Page {
    /// Build a page for `total_items` results.
    ///
    /// Out-of-range page numbers are clamped; an empty result list has a
    /// single empty page.
    pub fn new(total_items: usize, requested: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let number = requested.clamp(1, total_pages.max(1));

        Self {
            number,
            total_pages,
            total_items,
            page_size,
        }
    }

    /// Index range of this page within the result list
    pub fn range(&self) -> Range<usize> {
        let start = ((self.number - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    /// 1-based position of the first item shown, 0 when empty
    pub fn first_item(&self) -> usize {
        let range = self.range();
        if range.is_empty() {
            0
        } else {
            range.start + 1
        }
    }

    /// 1-based position of the last item shown
    pub fn last_item(&self) -> usize {
        self.range().end
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = Page::new(120, 1, PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.range(), 0..50);
        assert_eq!(page.first_item(), 1);
        assert_eq!(page.last_item(), 50);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_last_partial_page() {
        let page = Page::new(120, 3, PAGE_SIZE);
        assert_eq!(page.range(), 100..120);
        assert_eq!(page.first_item(), 101);
        assert_eq!(page.last_item(), 120);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_requested_page_clamped() {
        assert_eq!(Page::new(120, 9, PAGE_SIZE).number, 3);
        assert_eq!(Page::new(120, 0, PAGE_SIZE).number, 1);
    }

    #[test]
    fn test_empty_results() {
        let page = Page::new(0, 4, PAGE_SIZE);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.first_item(), 0);
        assert_eq!(page.last_item(), 0);
        assert!(!page.has_next());
        assert!(page.slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (0..7).collect();
        let page = Page::new(items.len(), 2, 3);
        assert_eq!(page.slice(&items), &[3, 4, 5]);
    }
}
