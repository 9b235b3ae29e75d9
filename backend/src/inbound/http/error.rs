//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest
        | ErrorCode::ItemUnavailable
        | ErrorCode::SelfSwapForbidden
        | ErrorCode::InsufficientPoints
        | ErrorCode::NotItemOwner
        | ErrorCode::InvalidAction => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotAuthorized => StatusCode::FORBIDDEN,
        ErrorCode::NotFound | ErrorCode::SwapNotFound => StatusCode::NOT_FOUND,
        ErrorCode::SwapAlreadyProcessed => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::item_unavailable("taken"), StatusCode::BAD_REQUEST)]
    #[case(Error::self_swap_forbidden("own item"), StatusCode::BAD_REQUEST)]
    #[case(Error::insufficient_points("broke"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_item_owner("not yours"), StatusCode::BAD_REQUEST)]
    #[case(Error::invalid_action("what"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("who"), StatusCode::UNAUTHORIZED)]
    #[case(Error::not_authorized("no"), StatusCode::FORBIDDEN)]
    #[case(Error::swap_not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::swap_already_processed("done"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_statuses(#[case] err: Error, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn internal_messages_are_redacted() {
        let err = Error::internal("connection string was postgres://secret");
        let redacted = redact_if_internal(&err);
        assert_eq!(redacted.message(), "Internal server error");
    }

    #[test]
    fn precondition_messages_pass_through() {
        let err = Error::item_unavailable("Item not available for swap");
        let mapped = redact_if_internal(&err);
        assert_eq!(mapped.message(), "Item not available for swap");
    }
}
