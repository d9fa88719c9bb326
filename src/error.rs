use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum ApiError {
    /* mapped errors */
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    QuickXmlSe(#[from] quick_xml::se::SeError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JoinError(#[from] JoinError),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    SetLoggerError(#[from] log::SetLoggerError),

    #[error(transparent)]
    MacAddressError(#[from] mac_address::MacAddressError),

    #[error(transparent)]
    HueError(#[from] hue::error::HueError),

    /* fauxbridge errors */
    #[error("No mac address configured, and none could be detected")]
    MissingMacAddress,

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl ApiError {
    pub fn service_error(msg: impl ToString) -> Self {
        Self::ServiceError(msg.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
