use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Invalid input handed to the comparison core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no filing records found for [{ticker}]")]
    EmptyHistory { ticker: String },

    #[error("no filing data source provided for [{ticker}]")]
    NoSource { ticker: String },

    #[error("[{ticker}] appears more than once in the ticker universe")]
    DuplicateTicker { ticker: String },

    #[error("invalid filing date \"{value}\", expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid value \"{value}\" for {var}")]
    InvalidConfig { var: &'static str, value: String },
}
