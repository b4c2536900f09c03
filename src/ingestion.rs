//! Conversion of rows handed over by the lease and payment stores.
//!
//! Stores deliver dates as text and amounts as floats. Both are validated
//! here, eagerly, so that a bad value is reported against the record it came
//! from instead of surfacing later as a wrong month key.

use crate::calendar::{parse_calendar_day, BillingDay};
use crate::error::{Result, ScheduleError};
use crate::schema::{lease_label, Lease, PaymentMethod, PaymentRecord, PaymentStatus};
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LeaseRow {
    #[serde(default)]
    pub id: Option<String>,

    #[schemars(description = "Lease start as YYYY-MM-DD or an RFC 3339 timestamp")]
    pub start_date: String,

    #[schemars(description = "Lease end as YYYY-MM-DD or an RFC 3339 timestamp")]
    pub end_date: String,

    #[serde(default)]
    #[schemars(description = "Billing day 1-31; 30 means the last day of the month")]
    pub payment_day: Option<u32>,

    pub rent_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaymentRow {
    pub id: String,
    pub due_date: String,
    pub amount: f64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub paid_date: Option<String>,
}

impl LeaseRow {
    pub fn to_lease(&self) -> Result<Lease> {
        let record = lease_label(self.id.as_deref());

        let start_date = parse_field(&record, "start_date", &self.start_date)?;
        let end_date = parse_field(&record, "end_date", &self.end_date)?;
        let payment_day = self
            .payment_day
            .map(BillingDay::from_payment_day)
            .transpose()?;

        if !self.rent_amount.is_finite() || self.rent_amount < 0.0 {
            return Err(ScheduleError::InvalidRentAmount(self.rent_amount.to_string()));
        }
        let rent_amount = Decimal::from_f64(self.rent_amount)
            .ok_or_else(|| ScheduleError::InvalidRentAmount(self.rent_amount.to_string()))?;

        Ok(Lease {
            id: self.id.clone(),
            start_date,
            end_date,
            payment_day,
            rent_amount,
        })
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(LeaseRow);
        serde_json::to_string_pretty(&schema)
    }
}

impl PaymentRow {
    pub fn to_record(&self) -> Result<PaymentRecord> {
        let record = format!("payment {}", self.id);

        let due_date = parse_field(&record, "due_date", &self.due_date)?;
        let paid_date = self
            .paid_date
            .as_deref()
            .map(|raw| parse_field(&record, "paid_date", raw))
            .transpose()?;

        let amount = Decimal::from_f64(self.amount)
            .filter(|_| self.amount.is_finite())
            .ok_or_else(|| ScheduleError::InvalidAmount {
                record: record.clone(),
                value: self.amount,
            })?;

        Ok(PaymentRecord {
            id: self.id.clone(),
            due_date,
            amount,
            status: self.status,
            payment_method: self.payment_method.clone(),
            paid_date,
        })
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(PaymentRow);
        serde_json::to_string_pretty(&schema)
    }
}

/// Converts every row, stopping at the first invalid one.
pub fn convert_payment_rows(rows: &[PaymentRow]) -> Result<Vec<PaymentRecord>> {
    rows.iter().map(PaymentRow::to_record).collect()
}

fn parse_field(record: &str, field: &str, raw: &str) -> Result<NaiveDate> {
    parse_calendar_day(raw).map_err(|_| ScheduleError::InvalidDate {
        record: record.to_string(),
        field: field.to_string(),
        value: raw.to_string(),
    })
}
