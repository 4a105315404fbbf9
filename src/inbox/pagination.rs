use log::debug;

use crate::model::{PageQuery, PageSize, last_page_index, page_count};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_index: u32,
    page_size: PageSize,
}

impl PaginationState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_page(&mut self, page_index: u32) {
        self.page_index = page_index;
    }

    /// Keeps the page index unless it would point past the last page of
    /// `total_items`, in which case the index is clamped to that last page.
    pub fn set_page_size(&mut self, page_size: PageSize, total_items: u64) {
        self.page_size = page_size;
        let last = last_page_index(total_items, page_size);
        if self.page_index > last {
            debug!(
                "page {} does not exist with page size {page_size}, moving to {last}",
                self.page_index
            );
            self.page_index = last;
        }
    }

    pub fn page_count(&self, total_items: u64) -> u64 {
        page_count(total_items, self.page_size)
    }

    /// Whether the current index lies past the last page holding rows.
    pub fn is_past_end(&self, total_items: u64) -> bool {
        self.page_index > last_page_index(total_items, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    archived: bool,
}

impl FilterState {
    pub fn archived(&self) -> bool {
        self.archived
    }

    /// Returns whether the filter changed.
    pub fn set_archived(&mut self, archived: bool) -> bool {
        let changed = self.archived != archived;
        self.archived = archived;
        changed
    }
}

pub fn page_query(pagination: &PaginationState, filter: &FilterState) -> PageQuery {
    PageQuery::new(pagination.page_index, pagination.page_size, filter.archived)
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    fn size(size: u32) -> PageSize {
        assert_ok!(PageSize::try_from(size))
    }

    #[fixture]
    fn pagination() -> PaginationState {
        PaginationState::new(size(10))
    }

    #[rstest]
    fn test_new_pagination_starts_on_first_page(pagination: PaginationState) {
        assert_eq!(0, pagination.page_index());
        assert_eq!(size(10), pagination.page_size());
    }

    #[rstest]
    fn test_page_size_change_keeps_valid_page(mut pagination: PaginationState) {
        pagination.set_page(1);
        pagination.set_page_size(size(5), 23);

        assert_eq!(1, pagination.page_index());
        assert_eq!(size(5), pagination.page_size());
    }

    #[rstest]
    #[case(23, 0)]
    #[case(0, 0)]
    fn test_page_size_change_clamps_page_past_end(
        mut pagination: PaginationState,
        #[case] total: u64,
        #[case] expected: u32,
    ) {
        pagination.set_page(2);
        pagination.set_page_size(size(25), total);

        assert_eq!(expected, pagination.page_index());
    }

    #[rstest]
    fn test_is_past_end(mut pagination: PaginationState) {
        pagination.set_page(2);
        assert!(!pagination.is_past_end(21));
        assert!(pagination.is_past_end(20));
        assert_eq!(2, pagination.page_count(20));
    }

    #[rstest]
    fn test_filter_reports_change() {
        let mut filter = FilterState::default();
        assert!(!filter.set_archived(false));
        assert!(filter.set_archived(true));
        assert!(filter.archived());
    }

    #[rstest]
    fn test_page_query_combines_pagination_and_filter(mut pagination: PaginationState) {
        let mut filter = FilterState::default();
        pagination.set_page(3);
        filter.set_archived(true);

        assert_eq!(
            PageQuery::new(3, size(10), true),
            page_query(&pagination, &filter)
        );
    }
}
