//! Filtering and location counting over the review dataset.

use std::collections::{HashMap, HashSet};

use tracker_core::models::{BusinessCount, Review};

/// Select the reviews matching a city, a category and an optional name.
///
/// * `city` must equal the review's city exactly (case-sensitive).
/// * `category` is a case-insensitive substring of the category tags.
/// * `business_name`, when present and non-empty, is a case-insensitive
///   substring of the business name.
///
/// Source order is preserved. No match yields an empty vector.
pub fn filter_reviews<'a>(
    reviews: &'a [Review],
    city: &str,
    category: &str,
    business_name: Option<&str>,
) -> Vec<&'a Review> {
    let category_lower = category.to_lowercase();
    let name_lower = business_name
        .filter(|n| !n.is_empty())
        .map(|n| n.to_lowercase());

    reviews
        .iter()
        .filter(|r| r.city == city)
        .filter(|r| r.has_category(&category_lower))
        .filter(|r| match &name_lower {
            Some(needle) => r.name_contains(needle),
            None => true,
        })
        .collect()
}

/// Count distinct locations per business name.
///
/// Rows are first deduplicated by `business_id` (the first occurrence wins),
/// so a location with many reviews counts once. The result is sorted by
/// count, descending; equal counts keep their first-encounter order.
pub fn count_locations_per_business<'a, I>(reviews: I) -> Vec<BusinessCount>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<BusinessCount> = Vec::new();

    for review in reviews {
        if !seen_ids.insert(review.business_id.as_str()) {
            continue;
        }
        match index.get(review.name.as_str()) {
            Some(&i) => counts[i].franchisee_count += 1,
            None => {
                index.insert(review.name.as_str(), counts.len());
                counts.push(BusinessCount {
                    name: review.name.clone(),
                    franchisee_count: 1,
                });
            }
        }
    }

    // `sort_by` is stable.
    counts.sort_by(|a, b| b.franchisee_count.cmp(&a.franchisee_count));
    counts
}

/// Names with strictly more than `threshold` locations, in `counts` order.
pub fn franchise_candidates(counts: &[BusinessCount], threshold: usize) -> Vec<String> {
    counts
        .iter()
        .filter(|c| c.franchisee_count > threshold)
        .map(|c| c.name.clone())
        .collect()
}

/// All reviews of the locations counted under `name`, in source order.
///
/// A location belongs to the name its first review carries, matching
/// [`count_locations_per_business`], so later rows for the same id under a
/// different name still come along.
pub fn reviews_for_business<'a>(reviews: &[&'a Review], name: &str) -> Vec<&'a Review> {
    let mut owner: HashMap<&str, &str> = HashMap::new();
    for review in reviews {
        owner
            .entry(review.business_id.as_str())
            .or_insert(review.name.as_str());
    }
    reviews
        .iter()
        .copied()
        .filter(|r| owner.get(r.business_id.as_str()) == Some(&name))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
