//! # Lease Schedule Builder
//!
//! A library for turning a lease and its recorded payments into a dense
//! month-by-month payment schedule.
//!
//! ## Core Concepts
//!
//! - **Recorded entries**: Payments already stored for the lease. A recorded
//!   payment is authoritative for its calendar month.
//! - **Projected entries**: Rent expected for months with no recorded payment,
//!   marked `Overdue` or `Pending` relative to a caller-supplied reference date.
//! - **Billing day**: The day of month rent falls due. The legacy value `30`
//!   means "last day of the month"; other days are clamped to the month length.
//! - **Day granularity**: All comparisons use calendar dates only. Timestamps
//!   are reduced to their calendar day before they reach the reconciler.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lease_schedule_builder::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let lease = Lease::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
//!     Some(1),
//!     dec!(1000),
//! )
//! .unwrap();
//!
//! let schedule = reconcile(&[], &lease, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap();
//! assert_eq!(schedule.len(), 3);
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod reconciler;
pub mod schema;
pub mod summary;

pub use calendar::{
    days_in_month, normalize_to_day, parse_calendar_day, resolve_effective_day, BillingDay,
    MonthKey, ToCalendarDay,
};
pub use config::{DuplicateMonthPolicy, InvalidRangePolicy, ReconcilerConfig};
pub use error::{Result, ScheduleError};
pub use ingestion::{convert_payment_rows, LeaseRow, PaymentRow};
pub use reconciler::ScheduleReconciler;
pub use schema::*;
pub use summary::{verify_schedule, ScheduleSummary};

use chrono::NaiveDate;
use log::{debug, info};

pub struct ScheduleProcessor;

impl ScheduleProcessor {
    /// Validates store rows and reconciles them into a schedule.
    pub fn process(
        lease_row: &LeaseRow,
        payment_rows: &[PaymentRow],
        reference_date: NaiveDate,
        config: &ReconcilerConfig,
    ) -> Result<Vec<ScheduledPaymentEntry>> {
        let lease = lease_row.to_lease()?;
        let payments = convert_payment_rows(payment_rows)?;

        info!(
            "Building payment schedule for {} as of {}",
            lease.label(),
            reference_date
        );
        debug!(
            "Lease runs {} to {} with {} recorded payments",
            lease.start_date,
            lease.end_date,
            payments.len()
        );

        let reconciler = ScheduleReconciler::new(config.clone());
        let schedule = reconciler.reconcile(&payments, &lease, reference_date)?;

        let summary = ScheduleSummary::from_entries(&schedule);
        debug!(
            "Schedule has {} months ({} recorded, {} projected, {} overdue)",
            summary.months, summary.recorded, summary.projected, summary.overdue
        );

        Ok(schedule)
    }

    pub fn process_with_verification(
        lease_row: &LeaseRow,
        payment_rows: &[PaymentRow],
        reference_date: NaiveDate,
        config: &ReconcilerConfig,
    ) -> Result<Vec<ScheduledPaymentEntry>> {
        let schedule = Self::process(lease_row, payment_rows, reference_date, config)?;

        verify_schedule(&schedule)?;

        Ok(schedule)
    }
}

/// Reconciles with the default policies: last write wins for duplicate
/// months, and an inverted lease range yields an empty schedule.
pub fn reconcile(
    existing_payments: &[PaymentRecord],
    lease: &Lease,
    reference_date: NaiveDate,
) -> Result<Vec<ScheduledPaymentEntry>> {
    ScheduleReconciler::default().reconcile(existing_payments, lease, reference_date)
}
