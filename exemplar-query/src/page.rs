//! Page request and page envelope types.
//!
//! Page numbers are 0-based: page 0 with size 20 covers offsets 0..20.

use serde::{Deserialize, Serialize};

use crate::sort::OrderBy;

/// A request for one page of results.
///
/// # Examples
///
/// ```rust
/// use exemplar_query::{OrderBy, OrderByField, PageRequest};
///
/// let request = PageRequest::new(2, 25).sort(OrderBy::Field(OrderByField::desc("created_on")));
/// assert_eq!(request.offset(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 0-based page number.
    pub number: u64,
    /// Page size in rows.
    pub size: u64,
    /// Requested ordering.
    pub sort: OrderBy,
}

impl PageRequest {
    /// Request the given 0-based page with the given size, unsorted.
    pub fn new(number: u64, size: u64) -> Self {
        PageRequest {
            number,
            size,
            sort: OrderBy::None,
        }
    }

    /// Attach a sort specification.
    pub fn sort(mut self, sort: OrderBy) -> Self {
        self.sort = sort;
        self
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        self.number * self.size
    }
}

/// One page of results plus the paging bookkeeping callers need to render
/// navigation: total row count, page coordinates, and the sort that applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in query order.
    pub items: Vec<T>,
    /// Total rows matching the filter, across all pages.
    pub total: u64,
    /// 0-based page number of this page.
    pub number: u64,
    /// Requested page size (the last page may hold fewer items).
    pub size: u64,
    /// Sort that produced the item order.
    pub sort: OrderBy,
}

impl<T> Page<T> {
    /// Assemble a page from query results and the originating request.
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Page {
            items,
            total,
            number: request.number,
            size: request.size,
            sort: request.sort.clone(),
        }
    }

    /// An empty page for a filter that matched nothing.
    pub fn empty(request: &PageRequest) -> Self {
        Page::new(Vec::new(), request, 0)
    }

    /// Total number of pages at this page size.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the items on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Map the items while keeping the paging bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            number: self.number,
            size: self.size,
            sort: self.sort,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(0, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(0, 10);
        let page = Page::new(vec![1, 2, 3], &request, 31);
        assert_eq!(page.total_pages(), 4);
        assert!(page.has_next());

        let last = Page::new(vec![1], &PageRequest::new(3, 10), 31);
        assert!(!last.has_next());
    }

    #[test]
    fn test_zero_size_has_no_pages() {
        let page: Page<i32> = Page::new(vec![], &PageRequest::new(0, 0), 5);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_page_keeps_the_request_coordinates() {
        let request = PageRequest::new(2, 50);
        let page: Page<i32> = Page::empty(&request);
        assert_eq!(page.total, 0);
        assert_eq!(page.number, 2);
        assert_eq!(page.size, 50);
        assert!(page.is_empty());
    }

    #[test]
    fn test_iteration_and_map() {
        let request = PageRequest::new(0, 10);
        let page = Page::new(vec![1, 2, 3], &request, 3);
        let doubled = page.clone().map(|n| n * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
        assert_eq!(page.iter().sum::<i32>(), 6);
        assert_eq!(page.into_iter().count(), 3);
    }
}
