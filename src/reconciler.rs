use crate::calendar::{resolve_effective_day, MonthKey};
use crate::config::{DuplicateMonthPolicy, InvalidRangePolicy, ReconcilerConfig};
use crate::error::{Result, ScheduleError};
use crate::schema::{Lease, PaymentRecord, PaymentStatus, ScheduledPaymentEntry};
use chrono::NaiveDate;
use log::{debug, trace, warn};
use std::collections::BTreeMap;

/// Merges recorded payments with projected rent into one entry per month.
#[derive(Debug, Clone, Default)]
pub struct ScheduleReconciler {
    config: ReconcilerConfig,
}

impl ScheduleReconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Builds the month-by-month schedule for `lease`.
    ///
    /// `existing_payments` must already be scoped to this lease. Months
    /// without a record get a projected entry for `lease.rent_amount`, marked
    /// `Overdue` when its due date is strictly before `reference_date` and
    /// `Pending` otherwise.
    pub fn reconcile(
        &self,
        existing_payments: &[PaymentRecord],
        lease: &Lease,
        reference_date: NaiveDate,
    ) -> Result<Vec<ScheduledPaymentEntry>> {
        lease.validate_rent()?;

        let start = lease.start_date;
        let end = lease.end_date;
        if end < start {
            return match self.config.invalid_range_policy {
                InvalidRangePolicy::Empty => {
                    debug!(
                        "{} ends {} before it starts {}; schedule is empty",
                        lease.label(),
                        end,
                        start
                    );
                    Ok(Vec::new())
                }
                InvalidRangePolicy::Reject => Err(ScheduleError::InvalidRange { start, end }),
            };
        }

        let mut month = MonthKey::of(start);
        if self.billing_date(lease, month)? < start {
            month = month.next();
        }
        let last = MonthKey::of(end);

        let recorded = self.index_by_month(existing_payments, month, last)?;

        debug!(
            "Reconciling {} from {} to {} against {} recorded payments",
            lease.label(),
            month,
            last,
            recorded.len()
        );

        let mut entries = Vec::new();
        while month <= last {
            let entry = match recorded.get(&month) {
                Some(record) => ScheduledPaymentEntry::from_record(record),
                None => {
                    let due_date = self.billing_date(lease, month)?;
                    let status = if due_date < reference_date {
                        PaymentStatus::Overdue
                    } else {
                        PaymentStatus::Pending
                    };
                    ScheduledPaymentEntry::projected(due_date, lease.rent_amount, status)
                }
            };
            trace!(
                "{}: {:?} due {} (recorded: {})",
                month,
                entry.status,
                entry.due_date,
                entry.is_existing
            );
            entries.push(entry);
            month = month.next();
        }

        Ok(entries)
    }

    fn billing_date(&self, lease: &Lease, month: MonthKey) -> Result<NaiveDate> {
        let day = resolve_effective_day(
            month.year,
            month.month,
            lease.payment_day,
            lease.start_date,
        );
        month.billing_date(day)
    }

    /// Indexes records by month, keeping only months in `[first, last]`.
    fn index_by_month<'a>(
        &self,
        payments: &'a [PaymentRecord],
        first: MonthKey,
        last: MonthKey,
    ) -> Result<BTreeMap<MonthKey, &'a PaymentRecord>> {
        let mut index: BTreeMap<MonthKey, &'a PaymentRecord> = BTreeMap::new();

        for payment in payments {
            let key = MonthKey::of(payment.due_date);
            if key < first || key > last {
                trace!("Payment '{}' for {} is outside the schedule", payment.id, key);
                continue;
            }
            let Some(current) = index.get(&key).copied() else {
                index.insert(key, payment);
                continue;
            };

            match self.config.duplicate_policy {
                DuplicateMonthPolicy::LastWriteWins => {
                    warn!(
                        "Payment '{}' replaces '{}' for {}",
                        payment.id, current.id, key
                    );
                    index.insert(key, payment);
                }
                DuplicateMonthPolicy::LatestDueDate => {
                    if payment.due_date >= current.due_date {
                        warn!(
                            "Payment '{}' replaces '{}' for {}",
                            payment.id, current.id, key
                        );
                        index.insert(key, payment);
                    } else {
                        warn!(
                            "Payment '{}' ignored for {}; '{}' is due later",
                            payment.id, key, current.id
                        );
                    }
                }
                DuplicateMonthPolicy::Reject => {
                    return Err(ScheduleError::DuplicateMonth {
                        year: key.year,
                        month: key.month,
                        first: current.id.clone(),
                        second: payment.id.clone(),
                    });
                }
            }
        }

        Ok(index)
    }
}
