use crate::calendar::MonthKey;
use crate::error::{Result, ScheduleError};
use crate::schema::{PaymentStatus, ScheduledPaymentEntry};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger-level totals over a reconciled schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScheduleSummary {
    pub months: usize,
    pub recorded: usize,
    pub projected: usize,
    pub pending: usize,
    pub paid: usize,
    pub overdue: usize,
    pub cancelled: usize,
    /// Sum over every entry that is not cancelled.
    pub total_scheduled: Decimal,
    pub total_paid: Decimal,
    /// Sum over pending and overdue entries.
    pub total_outstanding: Decimal,
    pub total_overdue: Decimal,
    pub first_due: Option<NaiveDate>,
    pub last_due: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn from_entries(entries: &[ScheduledPaymentEntry]) -> Self {
        let mut summary = Self {
            months: entries.len(),
            first_due: entries.first().map(|e| e.due_date),
            last_due: entries.last().map(|e| e.due_date),
            ..Self::default()
        };

        for entry in entries {
            if entry.is_existing {
                summary.recorded += 1;
            } else {
                summary.projected += 1;
            }

            match entry.status {
                PaymentStatus::Pending => summary.pending += 1,
                PaymentStatus::Paid => {
                    summary.paid += 1;
                    summary.total_paid += entry.amount;
                }
                PaymentStatus::Overdue => {
                    summary.overdue += 1;
                    summary.total_overdue += entry.amount;
                }
                PaymentStatus::Cancelled => summary.cancelled += 1,
            }

            if entry.status != PaymentStatus::Cancelled {
                summary.total_scheduled += entry.amount;
            }
            if entry.status.is_outstanding() {
                summary.total_outstanding += entry.amount;
            }
        }

        summary
    }
}

/// Checks that a schedule can be rendered as a monthly ledger as-is: months
/// strictly ascending with no repeats, and projected entries only ever
/// pending or overdue.
pub fn verify_schedule(entries: &[ScheduledPaymentEntry]) -> Result<()> {
    let mut previous: Option<MonthKey> = None;

    for entry in entries {
        let month = MonthKey::of(entry.due_date);
        if let Some(prev) = previous {
            if month <= prev {
                return Err(ScheduleError::ScheduleIntegrity(format!(
                    "entry due {} does not follow month {}",
                    entry.due_date, prev
                )));
            }
        }
        previous = Some(month);

        if !entry.is_existing && !entry.status.is_outstanding() {
            return Err(ScheduleError::ScheduleIntegrity(format!(
                "projected entry due {} has status {:?}",
                entry.due_date, entry.status
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recorded(due: NaiveDate, amount: Decimal, status: PaymentStatus) -> ScheduledPaymentEntry {
        ScheduledPaymentEntry {
            is_existing: true,
            id: Some(format!("p-{}", due)),
            ..ScheduledPaymentEntry::projected(due, amount, status)
        }
    }

    #[test]
    fn test_summary_totals() {
        let entries = vec![
            recorded(date(2024, 1, 1), dec!(950), PaymentStatus::Paid),
            recorded(date(2024, 2, 1), dec!(1000), PaymentStatus::Cancelled),
            ScheduledPaymentEntry::projected(date(2024, 3, 1), dec!(1000), PaymentStatus::Overdue),
            ScheduledPaymentEntry::projected(date(2024, 4, 1), dec!(1000), PaymentStatus::Pending),
        ];

        let summary = ScheduleSummary::from_entries(&entries);
        assert_eq!(summary.months, 4);
        assert_eq!(summary.recorded, 2);
        assert_eq!(summary.projected, 2);
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.total_paid, dec!(950));
        assert_eq!(summary.total_scheduled, dec!(2950));
        assert_eq!(summary.total_outstanding, dec!(2000));
        assert_eq!(summary.total_overdue, dec!(1000));
        assert_eq!(summary.first_due, Some(date(2024, 1, 1)));
        assert_eq!(summary.last_due, Some(date(2024, 4, 1)));
    }

    #[test]
    fn test_empty_summary() {
        let summary = ScheduleSummary::from_entries(&[]);
        assert_eq!(summary, ScheduleSummary::default());
        assert!(verify_schedule(&[]).is_ok());
    }

    #[test]
    fn test_verify_rejects_repeated_month() {
        let entries = vec![
            ScheduledPaymentEntry::projected(date(2024, 3, 1), dec!(1), PaymentStatus::Pending),
            recorded(date(2024, 3, 20), dec!(1), PaymentStatus::Paid),
        ];
        assert!(matches!(
            verify_schedule(&entries),
            Err(ScheduleError::ScheduleIntegrity(_))
        ));
    }

    #[test]
    fn test_verify_rejects_paid_projection() {
        let entries = vec![ScheduledPaymentEntry::projected(
            date(2024, 3, 1),
            dec!(1),
            PaymentStatus::Paid,
        )];
        assert!(verify_schedule(&entries).is_err());
    }
}
