use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The response was empty")]
    EmptyResponse,
}

impl StripeApiError {
    /// True if the error was returned by Stripe itself (as opposed to a transport or decoding problem).
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::QueryError { .. })
    }
}
