use crate::error::{Result, SweepError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Product identifier as issued by the store.
///
/// The API sends numeric ids, the operator types digits; either way the value
/// is only ever echoed back, so it is carried as text and written out as a
/// number whenever it is one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawId")]
pub struct ProductId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for ProductId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl ProductId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JSON form used in request bodies: a number when the id is numeric
    pub fn to_json(&self) -> serde_json::Value {
        match self.as_number() {
            Some(n) => serde_json::Value::from(n),
            None => serde_json::Value::from(self.0.clone()),
        }
    }

    /// Numeric value, only when it prints back to the same text
    fn as_number(&self) -> Option<u64> {
        self.0.parse::<u64>().ok().filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog product snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    /// Tags exactly as stored, case preserved
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Absent or null when the product is hidden
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Product {
    pub fn is_hidden(&self) -> bool {
        self.published_at.is_none()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Inventory fields of a product variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Inventory service; `None` means stock is not tracked
    #[serde(default)]
    pub inventory_management: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

impl Variant {
    pub fn tracked(quantity: i64) -> Self {
        Self {
            inventory_management: Some("shopify".to_string()),
            inventory_quantity: Some(quantity),
        }
    }

    pub fn untracked() -> Self {
        Self::default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
}

/// Accept tags as the Admin API's `", "`-joined string or as a JSON array
fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTags>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(RawTags::List(tags)) => tags,
        Some(RawTags::Joined(joined)) => joined
            .split(", ")
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// A product as it came off the wire, not yet checked against [`Product`].
///
/// Listing pages are decoded one product at a time so a single bad record is
/// attributed to its own id instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProduct(serde_json::Value);

impl RawProduct {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The `id` field, read without decoding the rest of the record
    pub fn id(&self) -> Option<ProductId> {
        match self.0.get("id")? {
            serde_json::Value::Number(n) => n.as_u64().map(|n| ProductId::new(n.to_string())),
            serde_json::Value::String(s) => Some(ProductId::new(s.as_str())),
            _ => None,
        }
    }

    /// Decode into a [`Product`]; failures carry the product's id when it has one
    pub fn decode(&self) -> Result<Product> {
        serde_json::from_value(self.0.clone()).map_err(|err| match self.id() {
            Some(id) => SweepError::malformed_product(id.to_string(), err.to_string()),
            None => SweepError::Json(err),
        })
    }
}

impl TryFrom<&Product> for RawProduct {
    type Error = SweepError;

    fn try_from(product: &Product) -> Result<Self> {
        Ok(Self(serde_json::to_value(product)?))
    }
}

/// Body of `GET /products.json`
#[derive(Debug, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// Body of `GET /products/{id}.json`
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: RawProduct,
}

/// Raw HTTP response kept for tallying
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new<S: Into<String>>(method: S, url: S, status: u16, body: S) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Entry of the report's `responses` log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub method: String,
    pub requested_url: String,
    pub body: String,
    pub code: u16,
}

impl From<&HttpResponse> for ResponseRecord {
    fn from(response: &HttpResponse) -> Self {
        Self {
            method: response.method.to_lowercase(),
            requested_url: response.url.clone(),
            body: response.body.clone(),
            code: response.status,
        }
    }
}
