use crate::error::Result;
use crate::types::{HttpResponse, ProductId, RawProduct};
use std::future::Future;

/// Trait for store API implementations
pub trait StoreApi: Send + Sync {
    /// Fetch one page of the product listing.
    ///
    /// Products come back undecoded; a record that does not parse is a
    /// problem with that product, not with the page.
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Vec<RawProduct>>> + Send;

    /// Fetch a single product by id
    fn fetch_product(&self, id: &ProductId) -> impl Future<Output = Result<RawProduct>> + Send;

    /// Issue the unpublish update for a product.
    ///
    /// A non-2xx answer is returned as a response, not an error; errors are
    /// reserved for requests that never produced a response.
    fn unpublish(&self, id: &ProductId) -> impl Future<Output = Result<HttpResponse>> + Send;
}
