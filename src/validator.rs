use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use lescracks_core::AppError;

/// One `"field: message"` entry per failed rule, sorted by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut entries: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| describe(&error.code));
                format!("{}: {}", field, detail)
            })
        })
        .collect();
    entries.sort();
    entries
}

fn describe(code: &str) -> String {
    match code {
        "email" => "must be a valid email".to_string(),
        "url" => "must be a valid URL".to_string(),
        "length" => "has an invalid length".to_string(),
        other => format!("is invalid ({})", other),
    }
}

fn rejection_errors(rejection: &JsonRejection) -> Vec<String> {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return vec!["Missing 'Content-Type: application/json' header".to_string()];
    }

    let text = rejection.body_text();
    if let Some(field) = text
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return vec![format!("{}: is required", field)];
    }

    if text.contains("invalid type") || text.contains("invalid value") {
        return vec!["Invalid field type in request".to_string()];
    }

    vec!["Invalid request body".to_string()]
}

fn path_errors(rejection: &PathRejection) -> Vec<String> {
    let text = rejection.body_text();
    let detail = text.strip_prefix("Invalid URL: ").unwrap_or(&text);
    vec![format!("path: {}", detail)]
}

fn query_errors(rejection: &QueryRejection) -> Vec<String> {
    let text = rejection.body_text();
    let detail = text
        .strip_prefix("Failed to deserialize query string: ")
        .unwrap_or(&text);
    vec![detail.to_string()]
}

/// JSON body extractor that also runs `validator` rules.
///
/// Both decoding and rule failures become a 400 "Validation failed" envelope
/// whose `errors` lists the offending fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection_errors(&rejection)))?;

        value
            .validate()
            .map_err(|errors| AppError::validation(field_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// `Path` extractor whose rejection is a "Validation failed" envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(path_errors(&rejection)))?;
        Ok(ValidatedPath(value))
    }
}

/// `Query` extractor whose rejection is a "Validation failed" envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(query_errors(&rejection)))?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "must be at least 8 characters"))]
        password: String,
    }

    #[derive(Debug, serde::Deserialize)]
    struct Filters {
        category: Option<i32>,
    }

    #[tokio::test]
    async fn test_bad_query_becomes_validation_error() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/api/courses?category=abc")
            .body(())
            .unwrap()
            .into_parts();

        let err = ValidatedQuery::<Filters>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        let body = err.to_body();

        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Validation failed");
        let errors = body.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("category: "), "{:?}", errors);
    }

    #[tokio::test]
    async fn test_good_query_passes_through() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/api/courses?category=7")
            .body(())
            .unwrap()
            .into_parts();

        let ValidatedQuery(filters) = ValidatedQuery::<Filters>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(filters.category, Some(7));
    }

    #[test]
    fn test_field_errors_are_prefixed_and_sorted() {
        let dto = Signup {
            email: "nope".to_string(),
            password: "short".to_string(),
        };
        let errors = field_errors(&dto.validate().unwrap_err());

        assert_eq!(
            errors,
            vec![
                "email: must be a valid email".to_string(),
                "password: must be at least 8 characters".to_string(),
            ]
        );
    }
}
