use serde::Serialize;

/// Largest number of page links shown at once.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One page of an already ordered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    /// 1-based position of the first item on the page, `0` when empty.
    pub start: usize,
    /// 1-based position of the last item on the page, `0` when empty.
    pub end: usize,
}

/// Number of pages needed for `count` items. A page size of zero is
/// treated as one.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamps a requested page: `0` or anything past the last page becomes
/// page 1.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if page == 0 || page > total_pages {
        1
    } else {
        page
    }
}

/// Slices `items` into the requested page. Never returns an empty page when
/// the list has items.
#[must_use]
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total_pages(total, page_size);
    let page = clamp_page(page, total_pages);

    let offset = (page - 1) * page_size;
    let end = (offset + page_size).min(total);
    let slice = items.get(offset..end).unwrap_or_default();

    Page {
        items: slice,
        page,
        total_pages,
        total,
        start: if slice.is_empty() { 0 } else { offset + 1 },
        end: if slice.is_empty() { 0 } else { end },
    }
}

/// Page links around the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub current: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

/// Up to [`MAX_VISIBLE_PAGES`] page numbers centred on `current`, shifted
/// to stay within `1..=total_pages`. Empty when there is at most one page.
#[must_use]
pub fn page_window(current: usize, total_pages: usize) -> PageWindow {
    if total_pages <= 1 {
        return PageWindow {
            current: 1,
            ..PageWindow::default()
        };
    }
    let current = clamp_page(current, total_pages);
    let first = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let last = (first + MAX_VISIBLE_PAGES - 1).min(total_pages);
    let first = last.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);

    PageWindow {
        pages: (first..=last).collect(),
        current,
        previous: (current > 1).then(|| current - 1),
        next: (current < total_pages).then(|| current + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 24), 0);
        assert_eq!(total_pages(24, 24), 1);
        assert_eq!(total_pages(25, 24), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn paginate_slices_and_reports_range() {
        let items: Vec<u32> = (1..=10).collect();
        let page = paginate(&items, 4, 3);
        assert_eq!(page.items, &[9, 10]);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!((page.start, page.end), (9, 10));
    }

    #[test]
    fn out_of_range_page_clamps_to_first() {
        let items: Vec<u32> = (1..=10).collect();
        let page = paginate(&items, 4, 9);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, &[1, 2, 3, 4]);
        assert_eq!(paginate(&items, 4, 0).page, 1);
    }

    #[test]
    fn empty_list_has_empty_page() {
        let items: Vec<u32> = vec![];
        let page = paginate(&items, 4, 2);
        assert!(page.items.is_empty());
        assert_eq!((page.page, page.total_pages, page.start, page.end), (1, 0, 0, 0));
    }

    #[test]
    fn pages_cover_list_exactly_once() {
        let items: Vec<u32> = (1..=23).collect();
        let pages = total_pages(items.len(), 5);
        let joined: Vec<u32> = (1..=pages)
            .flat_map(|n| paginate(&items, 5, n).items.iter().copied())
            .collect();
        assert_eq!(joined, items);
        assert_eq!(paginate(&items, 5, 3), paginate(&items, 5, 3));
    }

    #[test]
    fn window_centres_on_current() {
        let window = page_window(5, 10);
        assert_eq!(window.pages, [3, 4, 5, 6, 7]);
        assert_eq!(window.previous, Some(4));
        assert_eq!(window.next, Some(6));
    }

    #[test]
    fn window_shifts_at_edges() {
        assert_eq!(page_window(1, 10).pages, [1, 2, 3, 4, 5]);
        assert_eq!(page_window(10, 10).pages, [6, 7, 8, 9, 10]);
        assert_eq!(page_window(2, 3).pages, [1, 2, 3]);
        assert_eq!(page_window(10, 10).next, None);
        assert_eq!(page_window(1, 10).previous, None);
    }

    #[test]
    fn single_page_has_no_window() {
        assert!(page_window(1, 1).pages.is_empty());
        assert!(page_window(1, 0).pages.is_empty());
    }
}
