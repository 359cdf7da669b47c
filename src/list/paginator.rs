use crate::ansi::{DIMMED, NORMAL};

const ACTIVE_DOT: &str = "•";
const INACTIVE_DOT: &str = "•";
const MAX_DOTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 1,
            total_pages: 1,
        }
    }
}

impl Paginator {
    /// Derives the page count from an item count; never drops below one page.
    pub fn set_total_pages(&mut self, items: usize) {
        let per_page = self.per_page.max(1);
        self.total_pages = items.div_ceil(per_page).max(1);
    }

    /// Start and end indices of the current page within a slice of `len` items.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.page * self.per_page).min(len);
        let end = (start + self.per_page).min(len);
        (start, end)
    }

    pub fn items_on_page(&self, total_items: usize) -> usize {
        if total_items == 0 {
            return 0;
        }
        let (start, end) = self.slice_bounds(total_items);
        end - start
    }

    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    pub fn on_last_page(&self) -> bool {
        self.page + 1 >= self.total_pages
    }

    pub fn prev_page(&mut self) {
        if !self.on_first_page() {
            self.page -= 1;
        }
    }

    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    pub fn view(&self) -> String {
        if self.total_pages > MAX_DOTS {
            return format!("{}/{}", self.page + 1, self.total_pages);
        }
        (0..self.total_pages)
            .map(|page| {
                if page == self.page {
                    ACTIVE_DOT.to_string()
                } else {
                    format!("{DIMMED}{INACTIVE_DOT}{NORMAL}")
                }
            })
            .collect()
    }
}
