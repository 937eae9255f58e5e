use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::ProductId;
use super::stage::Stage;
use super::standard::StandardKind;

pub const DEFAULT_VALIDITY_DAYS: u64 = 365;

/// Time-bounded proof that a product met a standard at one stage.
///
/// Fields are private: a certificate never changes after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    id: Uuid,
    product_id: ProductId,
    standard: StandardKind,
    stage: Stage,
    issue_date: NaiveDate,
    expiration_date: NaiveDate,
}

impl Certificate {
    pub fn issue(
        product_id: ProductId,
        standard: StandardKind,
        stage: Stage,
        issue_date: NaiveDate,
        validity_days: u64,
    ) -> Self {
        let expiration_date = issue_date
            .checked_add_days(Days::new(validity_days))
            .unwrap_or(NaiveDate::MAX);
        Self {
            id: Uuid::new_v4(),
            product_id,
            standard,
            stage,
            issue_date,
            expiration_date,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn standard(&self) -> StandardKind {
        self.standard
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    /// Valid through the expiration date inclusive.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        today <= self.expiration_date
    }

    /// Whether this certificate covers `stage` and is still valid on `today`.
    pub fn covers(&self, stage: Stage, today: NaiveDate) -> bool {
        self.stage == stage && self.is_valid_on(today)
    }
}
