//! Page slicing for report tables

use serde::Serialize;

use crate::table::Table;
use crate::types::PaginationMeta;

/// One page of a table plus the metadata the templates render
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub rows: Table,
    #[serde(flatten)]
    pub meta: PaginationMeta,
    /// 1-based index of the first row on this page, 0 when the page is empty
    pub start_item: usize,
    /// 1-based index of the last row on this page
    pub end_item: usize,
}

/// Slice `table` to the requested page.
///
/// The page is clamped into `[1, total_pages]`, so out-of-range requests land
/// on the nearest valid page. An empty table still has one (empty) page.
/// A `page_size` of zero is treated as one.
pub fn paginate(table: &Table, page: i64, page_size: usize) -> Page {
    let per_page = page_size.max(1);
    let total_items = table.len();
    let total_pages = total_items.div_ceil(per_page).max(1);

    let page = page.clamp(1, total_pages as i64) as usize;
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let rows = table.slice(start, end);

    Page {
        start_item: if rows.is_empty() { 0 } else { start + 1 },
        end_item: end,
        rows,
        meta: PaginationMeta {
            page,
            per_page,
            total_items,
            total_pages,
        },
    }
}
