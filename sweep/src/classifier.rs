//! Decides whether a catalog product is a sold-out vintage listing.
//!
//! Only the tag set, the variant count and the first variant's inventory
//! fields are consulted. Tag matching is case-sensitive and recognises exactly
//! two spellings, `vintage` and `Vintage`.

use crate::error::{Result, SweepError};
use crate::types::{Product, Variant};

/// Tag spellings that mark a vintage product
pub const VINTAGE_TAGS: [&str; 2] = ["vintage", "Vintage"];

/// Reason a product was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    ProductNotVintage,
    NoInventoryTracking,
    MultipleVariants,
    NotSoldOut,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::ProductNotVintage => "product is not vintage",
            Self::NoInventoryTracking => "item's inventory is not tracked",
            Self::MultipleVariants => "vintage item has multiple variants",
            Self::NotSoldOut => "item is not sold out",
        }
    }
}

/// Result of classifying one product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Skip(SkipReason),
    EligibleToHide,
}

/// The inputs the hide decision is allowed to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFacts<'a> {
    pub tags: &'a [String],
    pub inventory_tracked: bool,
    pub inventory_quantity: Option<i64>,
    pub variant_count: usize,
}

impl<'a> ProductFacts<'a> {
    /// Extract the decision inputs from a product.
    ///
    /// Fails when the product has no variants.
    pub fn from_product(product: &'a Product) -> Result<Self> {
        let first: &Variant = product.variants.first().ok_or_else(|| {
            SweepError::malformed_product(product.id.as_str(), "product has no variants")
        })?;

        Ok(Self {
            tags: &product.tags,
            inventory_tracked: first.inventory_management.is_some(),
            inventory_quantity: first.inventory_quantity,
            variant_count: product.variants.len(),
        })
    }

    fn is_vintage(&self) -> bool {
        self.tags
            .iter()
            .any(|tag| VINTAGE_TAGS.contains(&tag.as_str()))
    }
}

/// Classify a product from its decision inputs
pub fn classify(facts: &ProductFacts<'_>) -> Classification {
    if !facts.is_vintage() {
        return Classification::Skip(SkipReason::ProductNotVintage);
    }

    if !facts.inventory_tracked {
        return Classification::Skip(SkipReason::NoInventoryTracking);
    }

    match facts.inventory_quantity {
        Some(0) if facts.variant_count > 1 => Classification::Skip(SkipReason::MultipleVariants),
        Some(0) => Classification::EligibleToHide,
        _ => Classification::Skip(SkipReason::NotSoldOut),
    }
}

/// Convenience wrapper over [`ProductFacts::from_product`] and [`classify`]
pub fn classify_product(product: &Product) -> Result<Classification> {
    ProductFacts::from_product(product).map(|facts| classify(&facts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn product(tag_list: &[&str], variants: Vec<Variant>) -> Product {
        Product {
            id: ProductId::new("1"),
            title: None,
            tags: tags(tag_list),
            variants,
            published_at: Some("2020-01-01".to_string()),
        }
    }

    #[test]
    fn test_sold_out_single_variant_is_eligible() {
        let p = product(&["vintage", "scarf"], vec![Variant::tracked(0)]);
        assert_eq!(classify_product(&p).unwrap(), Classification::EligibleToHide);
    }

    #[test]
    fn test_untracked_vintage_is_skipped() {
        let p = product(&["Vintage"], vec![Variant::untracked()]);
        assert_eq!(
            classify_product(&p).unwrap(),
            Classification::Skip(SkipReason::NoInventoryTracking)
        );
    }

    #[test]
    fn test_multiple_variants_are_skipped() {
        let p = product(
            &["vintage"],
            vec![Variant::tracked(0), Variant::tracked(0), Variant::tracked(2)],
        );
        assert_eq!(
            classify_product(&p).unwrap(),
            Classification::Skip(SkipReason::MultipleVariants)
        );
    }

    #[test]
    fn test_non_vintage_is_skipped() {
        let p = product(&["summer"], vec![Variant::tracked(0)]);
        assert_eq!(
            classify_product(&p).unwrap(),
            Classification::Skip(SkipReason::ProductNotVintage)
        );
    }

    #[test]
    fn test_other_casings_do_not_match() {
        for tag in ["VINTAGE", "vINTAGE", " vintage", "vintage ", "vintage-clothing"] {
            let p = product(&[tag], vec![Variant::tracked(0)]);
            assert_eq!(
                classify_product(&p).unwrap(),
                Classification::Skip(SkipReason::ProductNotVintage),
                "tag {tag:?} should not count as vintage"
            );
        }
    }

    #[test]
    fn test_in_stock_and_negative_quantities_are_not_sold_out() {
        for quantity in [1, 12, -3] {
            let p = product(&["vintage"], vec![Variant::tracked(quantity)]);
            assert_eq!(
                classify_product(&p).unwrap(),
                Classification::Skip(SkipReason::NotSoldOut)
            );
        }
    }

    #[test]
    fn test_missing_quantity_is_not_sold_out() {
        let variant = Variant {
            inventory_management: Some("shopify".to_string()),
            inventory_quantity: None,
        };
        let p = product(&["vintage"], vec![variant]);
        assert_eq!(
            classify_product(&p).unwrap(),
            Classification::Skip(SkipReason::NotSoldOut)
        );
    }

    #[test]
    fn test_only_first_variant_inventory_counts() {
        let p = product(&["vintage"], vec![Variant::tracked(3), Variant::tracked(0)]);
        assert_eq!(
            classify_product(&p).unwrap(),
            Classification::Skip(SkipReason::NotSoldOut)
        );

        let p = product(&["vintage"], vec![Variant::untracked(), Variant::tracked(0)]);
        assert_eq!(
            classify_product(&p).unwrap(),
            Classification::Skip(SkipReason::NoInventoryTracking)
        );
    }

    #[test]
    fn test_product_without_variants_is_an_error() {
        let p = product(&["vintage"], vec![]);
        let err = classify_product(&p).unwrap_err();
        assert_eq!(err.product_id(), Some("1"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn non_vintage_tag() -> impl Strategy<Value = String> {
            "[A-Za-z ]{0,12}".prop_filter("must not be an accepted spelling", |t| {
                !VINTAGE_TAGS.contains(&t.as_str())
            })
        }

        proptest! {
            /// Property: without an accepted spelling the inventory never matters.
            #[test]
            fn non_vintage_always_skipped(
                tag_list in prop::collection::vec(non_vintage_tag(), 0..6),
                tracked in any::<bool>(),
                quantity in proptest::option::of(-5i64..5),
                variant_count in 1usize..5,
            ) {
                let facts = ProductFacts {
                    tags: &tag_list,
                    inventory_tracked: tracked,
                    inventory_quantity: quantity,
                    variant_count,
                };
                prop_assert_eq!(
                    classify(&facts),
                    Classification::Skip(SkipReason::ProductNotVintage)
                );
            }

            /// Property: the decision table for vintage products.
            #[test]
            fn vintage_decision_table(
                spelling in prop::sample::select(VINTAGE_TAGS.to_vec()),
                extra in prop::collection::vec(non_vintage_tag(), 0..4),
                tracked in any::<bool>(),
                quantity in proptest::option::of(-5i64..5),
                variant_count in 1usize..5,
            ) {
                let mut tag_list = extra.clone();
                tag_list.push(spelling.to_string());
                let facts = ProductFacts {
                    tags: &tag_list,
                    inventory_tracked: tracked,
                    inventory_quantity: quantity,
                    variant_count,
                };

                let expected = if !tracked {
                    Classification::Skip(SkipReason::NoInventoryTracking)
                } else if quantity != Some(0) {
                    Classification::Skip(SkipReason::NotSoldOut)
                } else if variant_count > 1 {
                    Classification::Skip(SkipReason::MultipleVariants)
                } else {
                    Classification::EligibleToHide
                };

                prop_assert_eq!(classify(&facts), expected);
                // Same input, same answer.
                prop_assert_eq!(classify(&facts), classify(&facts.clone()));
            }
        }
    }
}
