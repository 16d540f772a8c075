/// One zero-indexed page of a larger, already ordered collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cuts page `page_index` out of `records`. Out of range pages are empty.
    pub fn slice(records: Vec<T>, page_index: usize, page_size: usize) -> Self {
        let total_items = records.len();
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        let items = match page_index.checked_mul(page_size) {
            Some(start) if page_size > 0 && start < total_items => records
                .into_iter()
                .skip(start)
                .take(page_size)
                .collect(),
            _ => vec![],
        };

        Self {
            items,
            page_index,
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
