use thiserror::Error;

/// Transport-level failure while talking to the API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot get {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot get {url}: server answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("cannot read body for {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The response body could not be turned into a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot decode body for {locator}")]
    Malformed {
        locator: String,
        #[source]
        source: serde_json::Error,
    },
    /// The API answers `null` for ids it does not know.
    #[error("no record at {locator}")]
    Missing { locator: String },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A selector line could not be resolved to a record.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("invalid item token {line:?}: expected 'whatever [ITEM_ID]'")]
    MissingId { line: String },
    #[error("cannot convert item id {raw:?}")]
    InvalidId {
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("error fetching item {id}")]
    Api {
        id: u64,
        #[source]
        source: ApiError,
    },
}
