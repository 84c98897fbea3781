use crate::classifier::{classify_product, Classification, SkipReason};
use crate::error::Result;
use crate::tally::{Outcome, OutcomeTally};
use crate::traits::StoreApi;
use crate::types::{Product, ProductId, RawProduct};
use tracing::{error, info, warn};

const DIVIDER: &str = "------------------------------------------";

/// What a run scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Listing pages, both ends inclusive
    Pages { start: u32, end: u32 },
    /// One product looked up by id
    Product(ProductId),
}

impl Target {
    pub fn pages(start: u32, end: u32) -> Self {
        Self::Pages { start, end }
    }
}

/// How a run reacts to a product that fails to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the run with the product's error
    #[default]
    Abort,
    /// Tally the error and move on to the next product
    Continue,
}

/// What happened to a single product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductOutcome {
    Skipped(SkipReason),
    AlreadyHidden,
    Hidden,
    NotHidden { status: u16, body: String },
}

/// Sequential page driver
pub struct Sweep<'a, C: StoreApi> {
    api: &'a C,
    policy: ErrorPolicy,
}

impl<'a, C: StoreApi> Sweep<'a, C> {
    pub fn new(api: &'a C) -> Self {
        Self {
            api,
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run over `target`, accumulating into `tally`.
    ///
    /// Under [`ErrorPolicy::Abort`] the first product error ends the run; the
    /// failing id has already been recorded under `errors` by then.
    pub async fn run(&self, target: &Target, tally: &mut OutcomeTally) -> Result<()> {
        match target {
            Target::Pages { start, end } => {
                for page in *start..=*end {
                    self.run_page(page, tally).await?;
                }
                Ok(())
            }
            Target::Product(id) => {
                let raw = self.api.fetch_product(id).await?;
                self.handle(&raw, tally).await
            }
        }
    }

    async fn run_page(&self, page: u32, tally: &mut OutcomeTally) -> Result<()> {
        info!(page, "Starting page {page}");
        let products = self.api.fetch_page(page).await?;

        for raw in &products {
            self.handle(raw, tally).await?;
        }

        info!(page, products = products.len(), "Finished page {page}");
        Ok(())
    }

    /// Decode and process one product, applying the error policy to the result.
    ///
    /// A record without a usable id cannot be tallied; it still counts as a
    /// product error for the policy.
    async fn handle(&self, raw: &RawProduct, tally: &mut OutcomeTally) -> Result<()> {
        let result = match raw.decode() {
            Ok(product) => self.process_product(&product, tally).await.map(|_| ()),
            Err(err) => Err(err),
        };

        let Err(err) = result else {
            return Ok(());
        };

        let err = match raw.id() {
            Some(id) => {
                tally.record(Outcome::Errors, &id);
                error!(product_id = %id, "error on product {id}: {err}");
                err.for_product(id.as_str())
            }
            None => {
                error!("error on product without an id: {err}");
                err
            }
        };

        match self.policy {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::Continue => Ok(()),
        }
    }

    /// Classify one product and, when it qualifies, unpublish it.
    ///
    /// Every outcome except an error is tallied here; errors are left to the
    /// caller.
    pub async fn process_product(
        &self,
        product: &Product,
        tally: &mut OutcomeTally,
    ) -> Result<ProductOutcome> {
        let id = &product.id;
        info!("{DIVIDER}");

        match classify_product(product)? {
            Classification::Skip(reason) => {
                tally.record_skip(reason, id);
                info!(
                    product_id = %id,
                    reason = ?reason,
                    "Skipping product {id}: {}",
                    reason.description()
                );
                Ok(ProductOutcome::Skipped(reason))
            }
            Classification::EligibleToHide if product.is_hidden() => {
                tally.record(Outcome::ProductIsAlreadyHidden, id);
                info!(product_id = %id, "Vintage product is already hidden");
                Ok(ProductOutcome::AlreadyHidden)
            }
            Classification::EligibleToHide => self.hide(id, tally).await,
        }
    }

    async fn hide(&self, id: &ProductId, tally: &mut OutcomeTally) -> Result<ProductOutcome> {
        let response = self.api.unpublish(id).await?;
        tally.record_response(&response);

        if response.is_success() {
            tally.record(Outcome::SuccessfullyHidProduct, id);
            info!(product_id = %id, "Hid product {id}");
            Ok(ProductOutcome::Hidden)
        } else {
            tally.record(Outcome::UnableToHideProduct, id);
            warn!(
                product_id = %id,
                status = response.status,
                "Unable to hide product {id}: {}",
                response.body
            );
            Ok(ProductOutcome::NotHidden {
                status: response.status,
                body: response.body,
            })
        }
    }
}

/// Convenience wrapper: run `target` with `policy` into a fresh tally.
///
/// On error the partial tally is dropped with it.
pub async fn run_sweep<C: StoreApi>(
    api: &C,
    target: &Target,
    policy: ErrorPolicy,
) -> Result<OutcomeTally> {
    let mut tally = OutcomeTally::new();
    Sweep::new(api)
        .with_error_policy(policy)
        .run(target, &mut tally)
        .await?;
    Ok(tally)
}
