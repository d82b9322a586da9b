use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::query::{parse_page_size, posted_page};

/// Pagination parameters. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    pub page: u64,
    pub size: u64,
}

impl Default for Pageable {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

impl Pageable {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.max(1),
            size,
        }
    }

    /// Pagination of the current request, when the list is paginated.
    ///
    /// The page number comes from the posted payload and defaults to 1.
    pub fn from_request(ctx: &RequestContext) -> Option<Self> {
        let settings = ctx.settings();
        if !settings.pagination_enabled {
            return None;
        }
        let size = parse_page_size(settings.items_per_page.as_deref())?;
        let page = ctx.posted_query().and_then(posted_page).unwrap_or(1);
        Some(Self::new(page, size))
    }

    /// Offset of the first item of the page. Saturates for pages past
    /// `u64::MAX` items, which the remote answers with an empty list.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        let total_pages = if pageable.size == 0 {
            0
        } else {
            total_elements.div_ceil(pageable.size)
        };
        Self {
            content,
            page: pageable.page,
            size: pageable.size,
            total_elements,
            total_pages,
        }
    }

    /// A single page holding the whole result.
    pub fn unpaged(content: Vec<T>, total_elements: u64) -> Self {
        let size = content.len() as u64;
        Self {
            content,
            page: 1,
            size,
            total_elements,
            total_pages: u64::from(total_elements > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ViewSettings;

    #[test]
    fn test_offset() {
        assert_eq!(Pageable::new(1, 10).offset(), 0);
        assert_eq!(Pageable::new(3, 10).offset(), 20);
        assert_eq!(Pageable::new(0, 10).page, 1);
        assert_eq!(Pageable::new(u64::MAX, 10).offset(), u64::MAX);
    }

    #[test]
    fn test_total_pages() {
        let page = Page::new(vec![1, 2], &Pageable::new(2, 2), 5);
        assert_eq!(page.total_pages, 3);
        let empty: Page<u8> = Page::new(vec![], &Pageable::new(1, 0), 5);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(Page::unpaged(vec!["a"], 1).total_pages, 1);
    }

    #[test]
    fn test_from_request() {
        let ctx = RequestContext::new(ViewSettings::external("5").paginate("10"))
            .with_posted_query("city=Paris&page=4");
        assert_eq!(Pageable::from_request(&ctx), Some(Pageable::new(4, 10)));

        let ctx = RequestContext::new(ViewSettings::external("5").paginate("0"));
        assert_eq!(Pageable::from_request(&ctx), None);

        let ctx = RequestContext::new(ViewSettings::external("5"));
        assert_eq!(Pageable::from_request(&ctx), None);
    }
}
