use crate::article::ArticlePreview;

/// Number of result pages to fetch
///
/// `ceil(total_results / page_size)`, capped at `ceil(limit / page_size)`
/// when a limit is set.
///
/// # Arguments
///
/// * `total_results` - Result count reported by page 0
/// * `page_size` - Listings per page; treated as at least 1
/// * `limit` - Optional cap on the number of records
///
/// # Returns
///
/// The number of pages, starting from index 0, that the run fetches
pub fn total_pages(total_results: usize, page_size: u32, limit: Option<usize>) -> usize {
    let page_size = (page_size as usize).max(1);
    let pages = total_results.div_ceil(page_size);

    match limit {
        Some(limit) => pages.min(limit.div_ceil(page_size)),
        None => pages,
    }
}

/// Flattens per-page listings in page order, stopping at the limit
pub fn accumulate_listings(
    pages: Vec<Vec<ArticlePreview>>,
    limit: Option<usize>,
) -> Vec<ArticlePreview> {
    let mut listings = Vec::new();

    for page in pages {
        listings.extend(page);
        if let Some(limit) = limit {
            if listings.len() >= limit {
                listings.truncate(limit);
                break;
            }
        }
    }

    listings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(id: usize) -> ArticlePreview {
        ArticlePreview {
            article_id: format!("doc-{}", id),
            title: format!("Title {}", id),
            url: format!("/doc/{}", id),
            date: "May 1, 2024".to_string(),
            source: "Post".to_string(),
            author: String::new(),
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(130, 60, None), 3);
        assert_eq!(total_pages(120, 60, None), 2);
        assert_eq!(total_pages(1, 60, None), 1);
        assert_eq!(total_pages(0, 60, None), 0);
    }

    #[test]
    fn test_total_pages_capped_by_limit() {
        assert_eq!(total_pages(130, 60, Some(50)), 1);
        assert_eq!(total_pages(130, 60, Some(61)), 2);
        // Limit above the result count never adds pages
        assert_eq!(total_pages(30, 60, Some(500)), 1);
    }

    #[test]
    fn test_accumulate_truncates_in_discovery_order() {
        let pages = vec![
            (0..3).map(preview).collect(),
            (3..7).map(preview).collect(),
        ];

        let listings = accumulate_listings(pages, Some(5));

        assert_eq!(listings.len(), 5);
        let ids: Vec<&str> = listings.iter().map(|l| l.article_id.as_str()).collect();
        assert_eq!(ids, ["doc-0", "doc-1", "doc-2", "doc-3", "doc-4"]);
    }

    #[test]
    fn test_accumulate_without_limit_keeps_everything() {
        let pages = vec![vec![preview(0)], vec![], vec![preview(1), preview(2)]];
        assert_eq!(accumulate_listings(pages, None).len(), 3);
    }
}
