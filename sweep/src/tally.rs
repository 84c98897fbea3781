use crate::classifier::SkipReason;
use crate::error::Result;
use crate::types::{HttpResponse, ProductId, ResponseRecord};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name prefix of the JSON report
pub const REPORT_PREFIX: &str = "hide_sold_out_vintage_products";

/// Outcome buckets a product identifier can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Errors,
    Skipped,
    SkippedBecauseNoInventoryTracking,
    SkippedBecauseMultipleVariants,
    SkippedBecauseNotSoldOut,
    SkippedBecauseProductNotVintage,
    ProductIsAlreadyHidden,
    SuccessfullyHidProduct,
    UnableToHideProduct,
}

impl Outcome {
    /// Every category, in report order
    pub const ALL: [Outcome; 9] = [
        Outcome::Errors,
        Outcome::Skipped,
        Outcome::SkippedBecauseNoInventoryTracking,
        Outcome::SkippedBecauseMultipleVariants,
        Outcome::SkippedBecauseNotSoldOut,
        Outcome::SkippedBecauseProductNotVintage,
        Outcome::ProductIsAlreadyHidden,
        Outcome::SuccessfullyHidProduct,
        Outcome::UnableToHideProduct,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Errors => "errors",
            Self::Skipped => "skipped",
            Self::SkippedBecauseNoInventoryTracking => "skipped_because_no_inventory_tracking",
            Self::SkippedBecauseMultipleVariants => "skipped_because_multiple_variants",
            Self::SkippedBecauseNotSoldOut => "skipped_because_not_sold_out",
            Self::SkippedBecauseProductNotVintage => "skipped_because_product_not_vintage",
            Self::ProductIsAlreadyHidden => "product_is_already_hidden",
            Self::SuccessfullyHidProduct => "successfully_hid_product",
            Self::UnableToHideProduct => "unable_to_hide_product",
        }
    }
}

impl From<SkipReason> for Outcome {
    fn from(reason: SkipReason) -> Self {
        match reason {
            SkipReason::ProductNotVintage => Self::SkippedBecauseProductNotVintage,
            SkipReason::NoInventoryTracking => Self::SkippedBecauseNoInventoryTracking,
            SkipReason::MultipleVariants => Self::SkippedBecauseMultipleVariants,
            SkipReason::NotSoldOut => Self::SkippedBecauseNotSoldOut,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Product identifiers per outcome, accumulated over one run.
///
/// Field order is the report's key order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutcomeTally {
    errors: Vec<ProductId>,
    skipped: Vec<ProductId>,
    skipped_because_no_inventory_tracking: Vec<ProductId>,
    skipped_because_multiple_variants: Vec<ProductId>,
    skipped_because_not_sold_out: Vec<ProductId>,
    skipped_because_product_not_vintage: Vec<ProductId>,
    product_is_already_hidden: Vec<ProductId>,
    successfully_hid_product: Vec<ProductId>,
    unable_to_hide_product: Vec<ProductId>,
    responses: Vec<ResponseRecord>,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_mut(&mut self, outcome: Outcome) -> &mut Vec<ProductId> {
        match outcome {
            Outcome::Errors => &mut self.errors,
            Outcome::Skipped => &mut self.skipped,
            Outcome::SkippedBecauseNoInventoryTracking => {
                &mut self.skipped_because_no_inventory_tracking
            }
            Outcome::SkippedBecauseMultipleVariants => &mut self.skipped_because_multiple_variants,
            Outcome::SkippedBecauseNotSoldOut => &mut self.skipped_because_not_sold_out,
            Outcome::SkippedBecauseProductNotVintage => {
                &mut self.skipped_because_product_not_vintage
            }
            Outcome::ProductIsAlreadyHidden => &mut self.product_is_already_hidden,
            Outcome::SuccessfullyHidProduct => &mut self.successfully_hid_product,
            Outcome::UnableToHideProduct => &mut self.unable_to_hide_product,
        }
    }

    pub fn ids(&self, outcome: Outcome) -> &[ProductId] {
        match outcome {
            Outcome::Errors => &self.errors,
            Outcome::Skipped => &self.skipped,
            Outcome::SkippedBecauseNoInventoryTracking => {
                &self.skipped_because_no_inventory_tracking
            }
            Outcome::SkippedBecauseMultipleVariants => &self.skipped_because_multiple_variants,
            Outcome::SkippedBecauseNotSoldOut => &self.skipped_because_not_sold_out,
            Outcome::SkippedBecauseProductNotVintage => &self.skipped_because_product_not_vintage,
            Outcome::ProductIsAlreadyHidden => &self.product_is_already_hidden,
            Outcome::SuccessfullyHidProduct => &self.successfully_hid_product,
            Outcome::UnableToHideProduct => &self.unable_to_hide_product,
        }
    }

    pub fn record(&mut self, outcome: Outcome, id: &ProductId) {
        self.bucket_mut(outcome).push(id.clone());
    }

    /// Record a skip under its reason and under the generic `skipped` bucket
    pub fn record_skip(&mut self, reason: SkipReason, id: &ProductId) {
        self.record(Outcome::from(reason), id);
        self.record(Outcome::Skipped, id);
    }

    pub fn record_response(&mut self, response: &HttpResponse) {
        self.responses.push(ResponseRecord::from(response));
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    /// `(key, count)` for every category followed by `responses`
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Outcome::ALL
            .iter()
            .map(|outcome| (outcome.key(), self.ids(*outcome).len()))
            .collect();
        counts.push(("responses", self.responses.len()));
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the tally to a fresh timestamped file under `dir`.
    ///
    /// Returns the path written.
    pub fn write_report<P: AsRef<Path>>(
        &self,
        dir: P,
        finished_at: DateTime<Local>,
    ) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(report_file_name(finished_at));
        std::fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

pub fn report_file_name(finished_at: DateTime<Local>) -> String {
    format!(
        "{REPORT_PREFIX}_{}.json",
        finished_at.format("%Y-%m-%d_%H%M%S")
    )
}
