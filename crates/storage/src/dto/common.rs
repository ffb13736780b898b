use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A resolved, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Missing or non-positive values fall back to the defaults. Page sizes
    /// above [`MAX_PAGE_SIZE`] are capped.
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
        let clamp = |value: Option<i64>, default: u32| match value {
            Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
            _ => default,
        };
        Self {
            page: clamp(page, DEFAULT_PAGE),
            page_size: clamp(page_size, DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1)
            .max(0)
            .saturating_mul(i64::from(self.page_size))
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// Displayed rank of the `index`-th (0-based) row of this page.
    /// Positional: equal totals still get distinct ranks.
    pub fn rank_of(&self, index: usize) -> i64 {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        self.offset().saturating_add(index).saturating_add(1)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: Page, total_items: i64) -> Self {
        let page_size = i64::from(page.page_size.max(1));
        let total_pages = (total_items.max(0) + page_size - 1) / page_size;
        Self {
            page: page.page,
            page_size: page.page_size,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some(0), Some(0), 1, 10)]
    #[case(Some(-3), Some(-1), 1, 10)]
    #[case(Some(4), Some(25), 4, 25)]
    #[case(Some(1), Some(101), 1, 100)]
    #[case(Some(i64::MAX), Some(i64::MAX), u32::MAX, 100)]
    fn resolves_page_defaults(
        #[case] page: Option<i64>,
        #[case] size: Option<i64>,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
    ) {
        let resolved = Page::from_params(page, size);
        assert_eq!(resolved.page, expected_page);
        assert_eq!(resolved.page_size, expected_size);
    }

    #[test]
    fn rank_continues_across_pages() {
        let third = Page::from_params(Some(3), Some(5));
        assert_eq!(third.offset(), 10);
        assert_eq!(third.rank_of(0), 11);
        assert_eq!(third.rank_of(4), 15);
    }

    #[test]
    fn extreme_pages_stay_in_range() {
        let last = Page::from_params(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(last.offset(), (i64::from(u32::MAX) - 1) * 100);
        assert_eq!(last.rank_of(0), last.offset() + 1);

        let saturated = Page {
            page: u32::MAX,
            page_size: u32::MAX,
        };
        assert_eq!(saturated.offset(), i64::MAX);
        assert_eq!(saturated.rank_of(usize::MAX), i64::MAX);
    }

    #[test]
    fn total_pages_rounds_up() {
        let meta = PaginationMeta::new(Page::from_params(Some(1), Some(10)), 21);
        assert_eq!(meta.total_pages, 3);
        let empty = PaginationMeta::new(Page::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }
}
