use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid lease range: end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid rent amount {0}: must be a finite, non-negative number")]
    InvalidRentAmount(String),

    #[error("Invalid amount {value} on {record}: must be a finite number representable as a decimal")]
    InvalidAmount { record: String, value: f64 },

    #[error("Invalid payment day {0}: must be between 1 and 31")]
    InvalidPaymentDay(u32),

    #[error("Invalid date '{value}' in field '{field}' of {record}")]
    InvalidDate {
        record: String,
        field: String,
        value: String,
    },

    #[error("Multiple payments recorded for {year}-{month:02}: '{first}' and '{second}'")]
    DuplicateMonth {
        year: i32,
        month: u32,
        first: String,
        second: String,
    },

    #[error("Schedule integrity violation: {0}")]
    ScheduleIntegrity(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
