use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No rows available: every configured data feed was empty or missing")]
    NoData,

    #[error("Required column '{0}' was not found in any feed after header normalization")]
    MissingColumn(String),

    #[error("Invalid period: end date {end} is before start date {start}")]
    InvalidPeriod {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("CSV feed error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
