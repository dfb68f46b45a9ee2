use super::config::PaginationConfig;

/// Cursor for walking a channel's history backwards, one page at a time.
///
/// Discord returns messages newest-first; each page is requested with
/// `before` set to the oldest message id seen so far. A page shorter than
/// the configured page size means the history is exhausted.
pub struct MessageCursor {
    before: Option<u64>,
    pages_fetched: usize,
    exhausted: bool,
    config: PaginationConfig,
}

impl MessageCursor {
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            before: None,
            pages_fetched: 0,
            exhausted: false,
            config,
        }
    }

    /// Oldest message id seen so far, used as the `before` boundary
    pub fn before(&self) -> Option<u64> {
        self.before
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted && !self.has_reached_max()
    }

    /// Record a fetched page and move the boundary to its oldest message
    pub fn record_page(&mut self, oldest_id: Option<u64>, page_len: usize) {
        self.pages_fetched += 1;

        match oldest_id {
            Some(id) => self.before = Some(id),
            None => self.exhausted = true,
        }

        if page_len < self.config.page_size {
            self.exhausted = true;
        }
    }

    fn has_reached_max(&self) -> bool {
        self.config
            .max_pages
            .is_some_and(|max| self.pages_fetched >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page_advances_the_boundary() {
        let mut cursor = MessageCursor::new(PaginationConfig::new(100));
        assert!(cursor.has_more());
        assert_eq!(cursor.before(), None);

        cursor.record_page(Some(1234), 100);
        assert!(cursor.has_more());
        assert_eq!(cursor.before(), Some(1234));
    }

    #[test]
    fn short_page_exhausts_the_cursor() {
        let mut cursor = MessageCursor::new(PaginationConfig::new(100));
        cursor.record_page(Some(1234), 37);
        assert!(!cursor.has_more());
    }

    #[test]
    fn empty_page_exhausts_the_cursor() {
        let mut cursor = MessageCursor::new(PaginationConfig::new(100));
        cursor.record_page(None, 0);
        assert!(!cursor.has_more());
    }

    #[test]
    fn max_pages_caps_the_walk() {
        let mut cursor = MessageCursor::new(PaginationConfig::new(100).with_max_pages(1));
        cursor.record_page(Some(1234), 100);
        assert!(!cursor.has_more());
    }
}
