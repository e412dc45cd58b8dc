use crate::body::Body;
use crate::http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    response_builder, HeaderValue, Response, StatusCode,
};

/// Convert a value into the gateway's response type.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

/// Build a plain-text response with the content headers set. Every body the
/// gateway synthesizes itself (404, proxy failure) goes through here.
pub fn text_response<S>(status: StatusCode, body: S) -> Response
where
    S: Into<String>,
{
    let text = body.into();
    let mut builder = response_builder().status(status);
    if !text.is_empty() {
        builder = builder.header(CONTENT_LENGTH, text.len().to_string()).header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
    }
    builder
        .body(Body::text(text))
        .expect("text response builder should not fail")
}
