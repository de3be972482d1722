//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::{AccountError, AccountId};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> Error {
    let response = ResponseError::error_response(error);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[case(AccountError::EmailNotFound, StatusCode::NOT_FOUND)]
#[case(AccountError::PasswordMismatch, StatusCode::UNAUTHORIZED)]
#[case(AccountError::AccountNotFound { id: AccountId::new(1).expect("id") }, StatusCode::NOT_FOUND)]
#[case(AccountError::Disabled, StatusCode::UNAUTHORIZED)]
fn account_errors_select_status(#[case] error: AccountError, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&Error::from(error)), status);
}

#[rstest]
#[actix_web::test]
async fn trace_id_becomes_header() {
    let error = Error::not_found("missing").with_trace_id(TRACE_ID);
    let response = ResponseError::error_response(&error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace id header is set")
        .to_str()
        .expect("ascii header");
    assert_eq!(header, TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_sets_no_header() {
    let response = ResponseError::error_response(&Error::not_found("missing"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("db password is hunter2")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));

    let body = body_of(&error).await;

    assert_eq!(body.message(), "Internal server error");
    assert_eq!(body.trace_id(), Some(TRACE_ID));
    assert!(body.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::from(AccountError::PasswordMismatch);

    let body = body_of(&error).await;

    assert_eq!(body.message(), "password does not match");
    assert_eq!(body.details(), Some(&json!({ "code": "password_mismatch" })));
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_error = actix_web::error::ErrorBadRequest("raw");
    assert_eq!(Error::from(actix_error).code(), ErrorCode::InternalError);
}
