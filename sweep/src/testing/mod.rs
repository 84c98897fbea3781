//! Test doubles and fixtures for exercising a sweep without a live store.

pub mod mocks;

pub use mocks::{MockCall, MockStoreApi};

use crate::types::{Product, ProductId, Variant};

/// Build a product snapshot from its decision inputs
pub fn product(
    id: &str,
    tags: &[&str],
    variants: Vec<Variant>,
    published_at: Option<&str>,
) -> Product {
    Product {
        id: ProductId::new(id),
        title: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        variants,
        published_at: published_at.map(str::to_string),
    }
}

/// Published, tracked, single-variant vintage product with nothing in stock
pub fn sold_out_vintage(id: &str) -> Product {
    product(id, &["vintage"], vec![Variant::tracked(0)], Some("2020-01-01"))
}
