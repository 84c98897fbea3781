use crate::error::{Result, SweepError};
use crate::traits::StoreApi;
use crate::types::{HttpResponse, Product, ProductId, RawProduct};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A call observed by [`MockStoreApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    FetchPage(u32),
    FetchProduct(ProductId),
    Unpublish(ProductId),
}

/// Mock store API for testing
#[derive(Clone, Default)]
pub struct MockStoreApi {
    pub pages: HashMap<u32, Vec<RawProduct>>,
    pub products: HashMap<ProductId, RawProduct>,
    pub unpublish_responses: HashMap<ProductId, (u16, String)>,
    pub failing_unpublish: HashSet<ProductId>,
    pub failing_pages: HashSet<u32>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockStoreApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, products: Vec<Product>) -> Self {
        let raw: Vec<RawProduct> = products.iter().map(raw_product).collect();
        self.pages.insert(page, raw);
        self
    }

    /// Serve `products` verbatim, whether or not they decode
    pub fn with_raw_page(mut self, page: u32, products: Vec<serde_json::Value>) -> Self {
        self.pages
            .insert(page, products.into_iter().map(RawProduct::new).collect());
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id.clone(), raw_product(&product));
        self
    }

    /// Answer the unpublish call for `id` with `status` and `body`
    pub fn with_unpublish_response(mut self, id: &str, status: u16, body: &str) -> Self {
        self.unpublish_responses
            .insert(ProductId::new(id), (status, body.to_string()));
        self
    }

    /// Make the unpublish call for `id` fail without a response
    pub fn with_failing_unpublish(mut self, id: &str) -> Self {
        self.failing_unpublish.insert(ProductId::new(id));
        self
    }

    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Ids the sweep tried to unpublish, in order
    pub fn unpublished(&self) -> Vec<ProductId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Unpublish(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn log(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn url(id: &ProductId) -> String {
        format!("https://mock.store/admin/products/{id}.json")
    }
}

impl StoreApi for MockStoreApi {
    async fn fetch_page(&self, page: u32) -> Result<Vec<RawProduct>> {
        self.log(MockCall::FetchPage(page));
        if self.failing_pages.contains(&page) {
            return Err(SweepError::UnexpectedStatus {
                status: 500,
                url: format!("https://mock.store/admin/products.json?page={page}"),
                body: "Internal Server Error".to_string(),
            });
        }
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<RawProduct> {
        self.log(MockCall::FetchProduct(id.clone()));
        self.products
            .get(id)
            .cloned()
            .ok_or_else(|| SweepError::UnexpectedStatus {
                status: 404,
                url: Self::url(id),
                body: r#"{"errors":"Not Found"}"#.to_string(),
            })
    }

    async fn unpublish(&self, id: &ProductId) -> Result<HttpResponse> {
        self.log(MockCall::Unpublish(id.clone()));
        if self.failing_unpublish.contains(id) {
            return Err(SweepError::request_failed(
                "PUT".to_string(),
                Self::url(id),
                "connection reset".to_string(),
            ));
        }

        let (status, body) = self
            .unpublish_responses
            .get(id)
            .cloned()
            .unwrap_or_else(|| {
                let body = format!(r#"{{"product":{{"id":{id},"published_at":null}}}}"#);
                (200, body)
            });
        Ok(HttpResponse::new("PUT".to_string(), Self::url(id), status, body))
    }
}

fn raw_product(product: &Product) -> RawProduct {
    RawProduct::try_from(product).expect("fixture products always serialize")
}
