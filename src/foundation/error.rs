use crate::foundation::core::Side;

/// Convenience result type used across stitchwork.
pub type StitchResult<T> = Result<T, StitchError>;

/// Top-level error taxonomy used by cart and customizer APIs.
///
/// Every variant is recoverable: callers report the message and keep their prior state.
#[derive(thiserror::Error, Debug)]
pub enum StitchError {
    /// Input rejected locally before any mutation or network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Advisory stock ceiling hit; the request was not sent.
    #[error("only {available} item(s) available in stock")]
    StockExceeded {
        /// Stock the client knows about for the item.
        available: u32,
    },

    /// Remote call failed (transport, non-success status, or undecodable body).
    #[error("network error: {0}")]
    Network(String),

    /// Server answered 401; the local session has been cleared.
    #[error("session expired, sign in again at {redirect}")]
    SessionExpired {
        /// Route the UI should navigate to.
        redirect: String,
    },

    /// An optimistic cart edit was rolled back because the server call failed.
    #[error("cart mutation failed: {reason}")]
    CartMutationFailed {
        /// Server message or transport error text.
        reason: String,
    },

    /// Neither side carries a non-empty text layer or an uploaded image.
    #[error("please customize at least one side")]
    NoCustomizationProvided,

    /// The product has no base garment image for a side that needs one.
    #[error("{side} base image is missing")]
    MissingBaseImage {
        /// Side lacking a base image.
        side: Side,
    },

    /// The customization endpoint succeeded without returning an id.
    #[error("customization id not returned")]
    CustomizationIdMissing,

    /// Producing a raster image for a side failed.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// Another submission holds the submit gate.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// Errors when serializing or deserializing wire data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StitchError {
    /// Build a [`StitchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StitchError::Network`] value.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Build a [`StitchError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`StitchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Warnings are shown to the user but are not failures (stock ceiling).
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::StockExceeded { .. })
    }
}

impl From<serde_json::Error> for StitchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
