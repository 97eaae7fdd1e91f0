//! Error taxonomy shared by the parser, case store, exporters and API router

use thiserror::Error;

/// Failure to read a rate from caller-supplied text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateParseError {
    #[error("Invalid bps value: {0}")]
    Bps(String),

    #[error("Invalid percent value: {0}")]
    Percent(String),

    #[error("Invalid numeric value: {0}")]
    Numeric(String),
}

#[derive(Debug, Error)]
pub enum OutrightError {
    #[error(transparent)]
    InvalidRate(#[from] RateParseError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Case not found: {0}")]
    CaseNotFound(usize),

    #[error("Workbook export is not available in this build")]
    WorkbookUnavailable,

    #[error("Case store I/O failed: {0}")]
    Store(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook export failed: {0}")]
    Workbook(String),
}

impl OutrightError {
    /// HTTP status equivalent for this error
    pub fn status_code(&self) -> u16 {
        match self {
            OutrightError::InvalidRate(_)
            | OutrightError::InvalidDate(_)
            | OutrightError::InvalidRequest(_)
            | OutrightError::WorkbookUnavailable => 400,
            OutrightError::CaseNotFound(_) => 404,
            OutrightError::Store(_) | OutrightError::Csv(_) | OutrightError::Workbook(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, OutrightError>;
