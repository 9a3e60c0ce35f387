pub const QUESTIONS_PER_PAGE: usize = 10;

/// The 1-based `page` of `items`. Pages before the first or past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: i64) -> Vec<T> {
    if page < 1 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
        .unwrap_or(usize::MAX);
    items
        .iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_hold_at_most_ten_items() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(paginate(&items, 1), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 2), (11..=20).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3), (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn concatenated_pages_reproduce_the_collection() {
        for len in [0, 1, 9, 10, 11, 30, 47] {
            let items: Vec<usize> = (0..len).collect();
            let mut rebuilt = Vec::new();
            let mut page = 1;
            loop {
                let chunk = paginate(&items, page);
                if chunk.is_empty() {
                    break;
                }
                assert!(chunk.len() <= QUESTIONS_PER_PAGE);
                rebuilt.extend(chunk);
                page += 1;
            }
            assert_eq!(rebuilt, items);
        }
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<i32> = (1..=5).collect();
        assert!(paginate(&items, 2).is_empty());
        assert!(paginate(&items, 9999).is_empty());
        assert!(paginate(&items, i64::MAX).is_empty());
        assert!(paginate(&items, 0).is_empty());
        assert!(paginate(&items, -1).is_empty());
    }
}
