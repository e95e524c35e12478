use serde::{Deserialize, Serialize};

/// Bounded, ordered slice of a result set plus position metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_elements: u64,
    pub total_pages: u64,
    /// `true` iff no further page exists.
    pub last: bool,
}

/// Number of pages needed to hold `total_elements` items.
pub fn total_pages(total_elements: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_elements.div_ceil(page_size as u64)
}

impl<T> Page<T> {
    /// Builds a page computing `total_pages` and `last` from the totals.
    pub fn from_parts(
        content: Vec<T>,
        page_number: usize,
        page_size: usize,
        total_elements: u64,
    ) -> Self {
        let total_pages = total_pages(total_elements, page_size);
        Self {
            content,
            page_number,
            page_size,
            total_elements,
            total_pages,
            last: (page_number as u64) + 1 >= total_pages,
        }
    }

    /// An empty first page.
    pub fn empty(page_size: usize) -> Self {
        Self::from_parts(Vec::new(), 0, page_size, 0)
    }

    /// Wraps a single optional record into a one- or zero-element page.
    ///
    /// Used by exact-key lookups; the totals describe the lookup result only,
    /// not the size of the backing store.
    pub fn single(item: Option<T>, page_size: usize) -> Self {
        let content: Vec<T> = item.into_iter().collect();
        let total = content.len() as u64;
        Self::from_parts(content, 0, page_size.max(1), total)
    }

    /// Checks the page-count and content-size invariants.
    pub fn is_consistent(&self) -> bool {
        if self.page_size == 0 {
            return self.content.is_empty();
        }
        self.total_pages == total_pages(self.total_elements, self.page_size)
            && self.content.len() <= self.page_size
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_computes_total_pages() {
        let page = Page::from_parts(vec![1, 2, 3], 0, 3, 10);
        assert_eq!(page.total_pages, 4);
        assert!(!page.last);
        assert!(page.is_consistent());

        let last = Page::from_parts(vec![10], 3, 3, 10);
        assert!(last.last);
    }

    #[test]
    fn single_wraps_optional_record() {
        let one = Page::single(Some("a"), 10);
        assert_eq!(one.total_elements, 1);
        assert_eq!(one.total_pages, 1);
        assert!(one.last);
        assert!(one.is_consistent());

        let none: Page<&str> = Page::single(None, 10);
        assert_eq!(none.total_elements, 0);
        assert_eq!(none.total_pages, 0);
        assert!(none.is_empty());
        assert!(none.is_consistent());
    }

    #[test]
    fn detects_inconsistent_totals() {
        let mut page = Page::from_parts(vec![1, 2], 0, 2, 5);
        page.total_pages = 2;
        assert!(!page.is_consistent());

        let oversized = Page::from_parts(vec![1, 2, 3], 0, 2, 3);
        assert!(!oversized.is_consistent());
    }

    #[test]
    fn deserializes_service_payload() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"content":[1,2],"pageNumber":0,"pageSize":2,"totalElements":3,
                "totalPages":2,"last":false,"first":true,"empty":false}"#,
        )
        .unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.is_consistent());
    }
}
