use crate::calendar::BillingDay;
use crate::error::{Result, ScheduleError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[schemars(description = "Not yet paid and not yet due")]
    Pending,

    #[schemars(description = "Settled in full")]
    Paid,

    #[schemars(description = "Due date has passed without payment")]
    Overdue,

    #[schemars(description = "Voided; no longer expected")]
    Cancelled,
}

impl PaymentStatus {
    /// Whether money is still expected for an entry in this status.
    pub fn is_outstanding(self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Check,
    Card,
    Other,
}

/// The lease terms a schedule is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Lease {
    #[serde(default)]
    #[schemars(description = "Identifier used in log lines and error messages")]
    pub id: Option<String>,

    #[schemars(description = "First day of the lease (YYYY-MM-DD)")]
    pub start_date: NaiveDate,

    #[schemars(description = "Last day of the lease (YYYY-MM-DD)")]
    pub end_date: NaiveDate,

    #[serde(default)]
    #[schemars(
        with = "Option<u32>",
        description = "Day of month rent is due, 1-31. The value 30 means the last day of every month. When absent the start date's day is used."
    )]
    pub payment_day: Option<BillingDay>,

    #[schemars(with = "f64", description = "Monthly rent used for projected entries")]
    pub rent_amount: Decimal,
}

impl Lease {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        payment_day: Option<u32>,
        rent_amount: Decimal,
    ) -> Result<Self> {
        let lease = Self {
            id: None,
            start_date,
            end_date,
            payment_day: payment_day.map(BillingDay::from_payment_day).transpose()?,
            rent_amount,
        };
        lease.validate_rent()?;
        Ok(lease)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn validate_rent(&self) -> Result<()> {
        if self.rent_amount < Decimal::ZERO {
            return Err(ScheduleError::InvalidRentAmount(
                self.rent_amount.to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn label(&self) -> String {
        lease_label(self.id.as_deref())
    }
}

/// How a lease is named in log lines and errors.
pub(crate) fn lease_label(id: Option<&str>) -> String {
    match id {
        Some(id) => format!("lease {}", id),
        None => "lease".to_string(),
    }
}

/// A payment transaction already stored for the lease.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PaymentRecord {
    pub id: String,
    pub due_date: NaiveDate,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

/// One month of a reconciled schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ScheduledPaymentEntry {
    pub due_date: NaiveDate,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    /// `true` when sourced from a recorded payment, `false` when projected.
    pub is_existing: bool,
    pub id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub paid_date: Option<NaiveDate>,
}

impl ScheduledPaymentEntry {
    pub fn from_record(record: &PaymentRecord) -> Self {
        Self {
            due_date: record.due_date,
            amount: record.amount,
            status: record.status,
            is_existing: true,
            id: Some(record.id.clone()),
            payment_method: record.payment_method.clone(),
            paid_date: record.paid_date,
        }
    }

    pub fn projected(due_date: NaiveDate, amount: Decimal, status: PaymentStatus) -> Self {
        Self {
            due_date,
            amount,
            status,
            is_existing: false,
            id: None,
            payment_method: None,
            paid_date: None,
        }
    }
}
