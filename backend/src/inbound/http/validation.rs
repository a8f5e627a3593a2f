//! Shared validation helpers for inbound HTTP adapters.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, web};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{ContentValidationError, CredentialsValidationError, Error};

/// Machine-readable code attached to field validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    EmptyTitle,
    TitleTooLong,
    EmptyContent,
    EmptyUsername,
    InvalidUsername,
    EmptyPassword,
    PasswordTooShort,
    MissingField,
}

impl FieldErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong => "title_too_long",
            Self::EmptyContent => "empty_content",
            Self::EmptyUsername => "empty_username",
            Self::InvalidUsername => "invalid_username",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooShort => "password_too_short",
            Self::MissingField => "missing_field",
        }
    }
}

/// `400` carrying `{field, code}` details.
pub(crate) fn field_error(
    field: &'static str,
    code: FieldErrorCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(
        field,
        FieldErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn map_content_error(err: ContentValidationError) -> Error {
    let code = match err {
        ContentValidationError::EmptyTitle => FieldErrorCode::EmptyTitle,
        ContentValidationError::TitleTooLong { .. } => FieldErrorCode::TitleTooLong,
        ContentValidationError::EmptyContent => FieldErrorCode::EmptyContent,
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let code = match err {
        CredentialsValidationError::EmptyUsername => FieldErrorCode::EmptyUsername,
        CredentialsValidationError::InvalidUsername(_) => FieldErrorCode::InvalidUsername,
        CredentialsValidationError::EmptyPassword => FieldErrorCode::EmptyPassword,
        CredentialsValidationError::PasswordTooShort { .. } => FieldErrorCode::PasswordTooShort,
    };
    field_error(err.field(), code, err.to_string())
}

/// Deserialise a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: absent
/// yields `None`, `null` yields `Some(None)`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match &err {
        JsonPayloadError::ContentType => Error::invalid_request("expected application/json body"),
        JsonPayloadError::Deserialize(inner) => Error::invalid_request(inner.to_string()),
        _ => Error::invalid_request("malformed JSON body"),
    };
    error.into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "unparseable path segment");
    Error::not_found("Not found.").into()
}

/// JSON extractor config reporting failures in the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Path extractor config: a segment of the wrong type names no resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, PASSWORD_MIN, TITLE_MAX, UserValidationError};
    use rstest::rstest;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        category: Option<Option<i64>>,
    }

    #[rstest]
    #[case("{}", None)]
    #[case(r#"{"category":null}"#, Some(None))]
    #[case(r#"{"category":7}"#, Some(Some(7)))]
    fn double_option_distinguishes_null_from_absent(
        #[case] body: &str,
        #[case] expected: Option<Option<i64>>,
    ) {
        let patch: Patch = serde_json::from_str(body).expect("valid patch");
        assert_eq!(patch.category, expected);
    }

    #[rstest]
    #[case(ContentValidationError::EmptyTitle, "title", "empty_title")]
    #[case(ContentValidationError::TitleTooLong { max: TITLE_MAX }, "title", "title_too_long")]
    #[case(ContentValidationError::EmptyContent, "content", "empty_content")]
    fn content_errors_name_the_field(
        #[case] err: ContentValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = map_content_error(err);
        assert_eq!(mapped.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            mapped.details(),
            Some(&json!({"field": field, "code": code}))
        );
    }

    #[rstest]
    #[case(CredentialsValidationError::EmptyUsername, "username", "empty_username")]
    #[case(
        CredentialsValidationError::InvalidUsername(UserValidationError::UsernameInvalidCharacters),
        "username",
        "invalid_username"
    )]
    #[case(CredentialsValidationError::EmptyPassword, "password", "empty_password")]
    #[case(
        CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN },
        "password",
        "password_too_short"
    )]
    fn credential_errors_name_the_field(
        #[case] err: CredentialsValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = map_credentials_error(err);
        assert_eq!(
            mapped.details(),
            Some(&json!({"field": field, "code": code}))
        );
    }

    #[rstest]
    fn missing_field_reports_the_name() {
        let err = missing_field_error("post");
        assert_eq!(err.message(), "missing required field: post");
    }
}
