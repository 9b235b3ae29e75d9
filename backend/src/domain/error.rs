//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    NotAuthorized,
    /// The requested resource does not exist.
    NotFound,
    /// The requested or offered item is not open to new swaps.
    ItemUnavailable,
    /// The requester already owns the requested item.
    SelfSwapForbidden,
    /// The requester's point balance cannot cover the offered points.
    InsufficientPoints,
    /// The offered item does not belong to the requester.
    NotItemOwner,
    /// The referenced swap does not exist.
    SwapNotFound,
    /// The swap already reached a terminal state.
    SwapAlreadyProcessed,
    /// The respond action is not `accept` or `reject`.
    InvalidAction,
    /// A collaborator store is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload surfaced to callers.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::swap_not_found("no such swap");
/// assert_eq!(err.code(), ErrorCode::SwapNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "item_unavailable")]
    code: ErrorCode,
    #[schema(example = "Item not available for swap")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error from a code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "pointsOffered" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotAuthorized`].
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotAuthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ItemUnavailable`].
    pub fn item_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ItemUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::SelfSwapForbidden`].
    pub fn self_swap_forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SelfSwapForbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::InsufficientPoints`].
    pub fn insufficient_points(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientPoints, message)
    }

    /// Convenience constructor for [`ErrorCode::NotItemOwner`].
    pub fn not_item_owner(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotItemOwner, message)
    }

    /// Convenience constructor for [`ErrorCode::SwapNotFound`].
    pub fn swap_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SwapNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::SwapAlreadyProcessed`].
    pub fn swap_already_processed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SwapAlreadyProcessed, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidAction`].
    pub fn invalid_action(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAction, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
