//! Mapping of payload validation failures to `invalid_request` errors.
//!
//! Every error carries `details.field` and a stable `details.code`.

use actix_web::web;
use serde_json::json;

use crate::domain::{
    AccountValidationError, Error, LoginValidationError, RegistrationValidationError,
};

fn field_error(field: &str, code: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn field_and_code(err: &AccountValidationError) -> (&'static str, &'static str) {
    match err {
        AccountValidationError::InvalidId => ("id", "invalid_id"),
        AccountValidationError::EmptyEmail => ("email", "empty_email"),
        AccountValidationError::InvalidEmail => ("email", "invalid_email"),
        AccountValidationError::EmailTooLong { .. } => ("email", "email_too_long"),
        AccountValidationError::EmptyUsername => ("username", "empty_username"),
        AccountValidationError::UsernameLength { .. } => ("username", "username_length"),
        AccountValidationError::UsernameInvalidCharacters => {
            ("username", "username_invalid_characters")
        }
        AccountValidationError::EmptyNickname => ("nickname", "empty_nickname"),
        AccountValidationError::NicknameTooLong { .. } => ("nickname", "nickname_too_long"),
        AccountValidationError::PhoneTooLong { .. } => ("phone", "phone_too_long"),
        AccountValidationError::GenderTooLong { .. } => ("gender", "gender_too_long"),
        AccountValidationError::EmptyPasswordHash => ("password", "empty_password"),
        AccountValidationError::UnknownRole(_) => ("roles", "unknown_role"),
        AccountValidationError::EmptyRoles => ("roles", "empty_roles"),
    }
}

/// Map a value-type failure to a field-scoped `invalid_request`.
pub(crate) fn account_validation_error(err: &AccountValidationError) -> Error {
    let (field, code) = field_and_code(err);
    field_error(field, code, err.to_string())
}

/// Map a login payload failure.
pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => account_validation_error(inner),
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

/// Map a registration payload failure.
pub(crate) fn registration_validation_error(err: &RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::Field(inner) => account_validation_error(inner),
        RegistrationValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

/// JSON extractor settings turning malformed bodies into `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}"))
            .with_details(json!({ "code": "malformed_body" }))
            .into()
    })
}
