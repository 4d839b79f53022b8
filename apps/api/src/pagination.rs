pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Resolved pagination window for a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub per_page: u32,
}

impl PageWindow {
    /// Clamps raw query params: page is 1-based, per_page capped at 100.
    pub fn resolve(page: Option<u32>, per_page: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        PageWindow { page, per_page }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let w = PageWindow::resolve(None, None);
        assert_eq!(w.page, 1);
        assert_eq!(w.per_page, DEFAULT_PER_PAGE);
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn test_per_page_capped() {
        let w = PageWindow::resolve(Some(3), Some(5000));
        assert_eq!(w.per_page, MAX_PER_PAGE);
        assert_eq!(w.offset(), 200);
    }

    #[test]
    fn test_zero_values_clamped() {
        let w = PageWindow::resolve(Some(0), Some(0));
        assert_eq!(w.page, 1);
        assert_eq!(w.per_page, 1);
    }
}
