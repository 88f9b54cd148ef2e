//! Offset/limit pagination.

use recall_core::config::QueryConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::{PagedResult, QueryRequest, ScoredDocument};

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub page_size: usize,
}

impl PageWindow {
    /// Validate a request's limit/offset. `limit == 0` selects the default.
    pub fn from_request(request: &QueryRequest, config: &QueryConfig) -> RecallResult<Self> {
        if request.limit < 0 {
            return Err(RecallError::ValidationError(format!(
                "limit must be non-negative, got {}",
                request.limit
            )));
        }
        if request.offset < 0 {
            return Err(RecallError::ValidationError(format!(
                "offset must be non-negative, got {}",
                request.offset
            )));
        }
        let limit = request.limit as u64;
        if limit > config.max_limit as u64 {
            return Err(RecallError::ValidationError(format!(
                "limit {limit} exceeds maximum {}",
                config.max_limit
            )));
        }
        let page_size = if limit == 0 {
            config.default_limit
        } else {
            limit as usize
        };
        Ok(Self {
            offset: usize::try_from(request.offset).unwrap_or(usize::MAX),
            page_size: page_size.max(1),
        })
    }

    /// Cut one page out of the full result and attach navigation metadata.
    pub fn apply(&self, all: &[ScoredDocument], query_time_ms: u64) -> PagedResult {
        let total_hits = all.len() as u64;
        let start = self.offset.min(all.len());
        let end = start.saturating_add(self.page_size).min(all.len());
        let page_size = self.page_size as u64;
        let total_pages = total_hits.div_ceil(page_size);
        let current_page = self.offset as u64 / page_size;
        PagedResult {
            items: all[start..end].to_vec(),
            total_hits,
            page_size,
            current_page,
            total_pages,
            has_next: current_page + 1 < total_pages,
            has_previous: current_page > 0,
            query_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::models::Document;

    fn hits(n: usize) -> Vec<ScoredDocument> {
        (0..n)
            .map(|i| ScoredDocument::new(Document::new(format!("d{i}"), "", ""), 1.0))
            .collect()
    }

    fn window(limit: i64, offset: i64) -> RecallResult<PageWindow> {
        PageWindow::from_request(
            &QueryRequest::new("q").with_page(limit, offset),
            &QueryConfig::default(),
        )
    }

    #[test]
    fn forty_seven_hits_in_pages_of_five() {
        let all = hits(47);
        let first = window(5, 0).unwrap().apply(&all, 0);
        assert_eq!(first.total_pages, 10);
        assert_eq!(first.current_page, 0);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = window(5, 45).unwrap().apply(&all, 0);
        assert_eq!(last.current_page, 9);
        assert_eq!(last.items.len(), 2);
        assert!(!last.has_next);
        assert!(last.has_previous);
    }

    #[test]
    fn offset_past_end_is_empty_page() {
        let page = window(5, 100).unwrap().apply(&hits(3), 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_hits, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn no_hits_has_no_pages() {
        let page = window(5, 0).unwrap().apply(&[], 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn zero_limit_uses_default() {
        assert_eq!(window(0, 0).unwrap().page_size, 10);
    }

    #[test]
    fn invalid_windows_rejected() {
        assert!(window(-1, 0).unwrap_err().is_validation());
        assert!(window(5, -1).unwrap_err().is_validation());
        assert!(window(1001, 0).unwrap_err().is_validation());
        assert!(window(1000, 0).is_ok());
    }
}
