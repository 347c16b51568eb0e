//! Category set for the listing filter control.

use std::collections::BTreeSet;

use crate::types::Product;

/// Sentinel label meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Build the category set for a product listing.
///
/// Returns [`ALL_CATEGORIES`] followed by every distinct category in
/// `products`, sorted. The empty label is kept; a product labelled `"All"`
/// does not add a second sentinel.
#[must_use]
pub fn category_set(products: &[Product]) -> Vec<String> {
    let distinct: BTreeSet<&str> = products
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| *c != ALL_CATEGORIES)
        .collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{Price, ProductId};

    fn product(id: u32, category: &str) -> Product {
        Product::new(ProductId::new(id), format!("Item {id}"), Price::ZERO, category)
    }

    #[test]
    fn test_empty_products_still_have_all() {
        assert_eq!(category_set(&[]), vec!["All".to_string()]);
    }

    #[test]
    fn test_dedupes_and_sorts() {
        let products = vec![
            product(1, "women's clothing"),
            product(2, "electronics"),
            product(3, "jewelery"),
            product(4, "electronics"),
            product(5, "men's clothing"),
        ];

        assert_eq!(
            category_set(&products),
            vec![
                "All",
                "electronics",
                "jewelery",
                "men's clothing",
                "women's clothing"
            ]
        );
    }

    #[test]
    fn test_case_sensitive_labels_stay_distinct() {
        let products = vec![product(1, "men"), product(2, "Men")];
        assert_eq!(category_set(&products), vec!["All", "Men", "men"]);
    }

    #[test]
    fn test_keeps_empty_label() {
        let products = vec![product(1, ""), product(2, "men")];
        assert_eq!(category_set(&products), vec!["All", "", "men"]);
    }

    #[test]
    fn test_all_label_is_not_repeated() {
        let products = vec![product(1, "All"), product(2, "men")];
        assert_eq!(category_set(&products), vec!["All", "men"]);
    }

    proptest! {
        #[test]
        fn prop_all_plus_sorted_distinct(categories in prop::collection::vec("[a-c]{0,2}|All", 0..20)) {
            let products: Vec<Product> = categories
                .iter()
                .zip(1..)
                .map(|(c, id)| product(id, c))
                .collect();

            let set = category_set(&products);
            prop_assert_eq!(set.first().map(String::as_str), Some(ALL_CATEGORIES));

            let mut expected: Vec<String> = categories
                .iter()
                .filter(|c| c.as_str() != ALL_CATEGORIES)
                .cloned()
                .collect();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(&set[1..], expected.as_slice());
        }
    }
}
