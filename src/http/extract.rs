//! Extractors whose rejections render through [`ApiError`].

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json<T>` that rejects with a 400 in the shared error shape.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// JSON body that may be missing entirely; an empty body yields `T::default()`.
#[derive(Debug, Clone, Default)]
pub struct OptionalJson<T>(pub T);

impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(OptionalJson)
            .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {}", e)))
    }
}

/// Query string that rejects with a 400 in the shared error shape.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Page number from a query string; `0` and absent mean the first page.
pub fn page_or_first(page: Option<usize>) -> usize {
    page.unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Reason {
        #[serde(default)]
        reason: String,
    }

    fn post(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_rejection_is_validation() {
        let result = JsonBody::<Reason>::from_request(post("{not json"), &()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_optional_json_defaults_on_empty_body() {
        let OptionalJson(reason) = OptionalJson::<Reason>::from_request(post(""), &()).await.unwrap();
        assert_eq!(reason, Reason::default());

        let OptionalJson(reason) = OptionalJson::<Reason>::from_request(post(r#"{"reason":"spam"}"#), &())
            .await
            .unwrap();
        assert_eq!(reason.reason, "spam");
    }

    #[test]
    fn test_page_or_first() {
        assert_eq!(page_or_first(None), 1);
        assert_eq!(page_or_first(Some(0)), 1);
        assert_eq!(page_or_first(Some(3)), 3);
    }
}
