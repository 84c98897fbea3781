use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Error types for catalog sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Request failed for {method} {url}: {message}")]
    RequestFailed {
        method: String,
        url: String,
        message: String,
    },

    #[error("Unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Malformed product {product_id}: {message}")]
    MalformedProduct { product_id: String, message: String },

    #[error("Error on product {product_id}: {source}")]
    ProductFailed {
        product_id: String,
        #[source]
        source: Box<SweepError>,
    },
}

impl SweepError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new request failed error
    pub fn request_failed<S: Into<String>>(method: S, url: S, message: S) -> Self {
        Self::RequestFailed {
            method: method.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed product error
    pub fn malformed_product<S: Into<String>>(product_id: S, message: S) -> Self {
        Self::MalformedProduct {
            product_id: product_id.into(),
            message: message.into(),
        }
    }

    /// Attach the product being processed to an error
    pub fn for_product<S: Into<String>>(self, product_id: S) -> Self {
        if self.product_id().is_some() {
            return self;
        }
        Self::ProductFailed {
            product_id: product_id.into(),
            source: Box::new(self),
        }
    }

    /// Product the error is attributed to, if any
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Self::ProductFailed { product_id, .. } | Self::MalformedProduct { product_id, .. } => {
                Some(product_id)
            }
            _ => None,
        }
    }
}
