//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level. Uploads are
/// streamed through unread, so the upload route's body limit still bounds
/// memory, and only their declared length is logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request = if is_multipart(request.headers()) {
        let (parts, body) = request.into_parts();
        log_request(&parts, &describe_upload(&parts.headers));
        Request::from_parts(parts, body)
    } else {
        let (parts, body) = request.into_parts();
        let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!("Could not read request body: {error}");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };

        log_request(&parts, &String::from_utf8_lossy(&body_bytes));
        Request::from_parts(parts, Body::from(body_bytes))
    };

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// The text logged in place of an upload's body.
fn describe_upload(headers: &HeaderMap) -> String {
    let length = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    format!("<multipart form data, {length} bytes>")
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it
/// is short enough to log in full.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(start) => {
            tracing::info!("Received request: {headers:#?}\nbody: {start}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {headers:#?}\nbody: {body:?}"),
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(start) => {
            tracing::info!("Sending response: {headers:#?}\nbody: {start}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {headers:#?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Bytes,
        extract::DefaultBodyLimit,
        http::{
            HeaderMap, HeaderValue, StatusCode,
            header::{CONTENT_LENGTH, CONTENT_TYPE},
        },
        middleware,
        routing::post,
    };
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };

    use super::{LOG_BODY_LENGTH_LIMIT, describe_upload, is_multipart, logging_middleware, truncate};

    #[test]
    fn uploads_are_described_by_declared_length() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=X"),
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("8"));

        assert!(is_multipart(&headers));
        assert_eq!(describe_upload(&headers), "<multipart form data, 8 bytes>");
    }

    #[test]
    fn form_bodies_are_not_uploads() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        assert!(!is_multipart(&headers));
    }

    #[test]
    fn truncates_on_character_boundaries() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        let got = truncate(&body).expect("body should be truncated");

        assert_eq!(got.chars().count(), LOG_BODY_LENGTH_LIMIT);
        assert_eq!(truncate("short"), None);
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: Bytes| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let bytes = Bytes::from_static(b"PK\x03\x04\xff\xfe not utf-8");

        let response = server.post("/echo").bytes(bytes.clone()).await;

        assert_eq!(response.as_bytes(), &bytes);
    }

    #[tokio::test]
    async fn upload_limit_applies_behind_the_middleware() {
        let app = Router::new()
            .route("/upload", post(|body: Bytes| async move { body.len().to_string() }))
            .layer(DefaultBodyLimit::max(16))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![b'x'; 1024]).file_name("big.csv"),
        );

        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
