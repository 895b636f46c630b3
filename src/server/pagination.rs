use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<usize>,
}

impl PageQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// Fixed-size page of an already-ordered sequence, selected by a 1-based
/// page index. Page 0 and pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = match page.checked_sub(1) {
        Some(n) => n.saturating_mul(QUESTIONS_PER_PAGE),
        None => return &[],
    };
    if start >= items.len() {
        return &[];
    }
    let end = usize::min(start + QUESTIONS_PER_PAGE, items.len());
    &items[start..end]
}
