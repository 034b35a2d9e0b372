//! Response middleware shared by the service routers.

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response, Json};

use crate::error::ErrorBody;

/// Stamp the failing request path into `AppError` bodies.
///
/// Install on the outermost router so nested routes still report the full
/// path.
pub async fn error_path_middleware(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;

    match response.extensions_mut().remove::<ErrorBody>() {
        Some(mut body) => {
            body.path = Some(path);
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn missing() -> Result<&'static str, AppError> {
        Err(AppError::not_found("Exercise", 42))
    }

    async fn fine() -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new()
            .nest(
                "/api/v1/exercises",
                Router::new().route("/:id", get(missing)),
            )
            .route("/ok", get(fine))
            .layer(middleware::from_fn(error_path_middleware))
    }

    #[tokio::test]
    async fn test_error_body_gets_full_path() {
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/api/v1/exercises/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.path.as_deref(), Some("/api/v1/exercises/42"));
        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "Exercise not found with ID: 42");
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = app()
            .oneshot(HttpRequest::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
