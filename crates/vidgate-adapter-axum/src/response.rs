use axum::body::Body as AxumBody;
use axum::http::{Response, StatusCode};
use futures::executor::block_on;
use futures_util::{pin_mut, StreamExt};
use tracing::error;

use vidgate_core::body::Body;
use vidgate_core::http::Response as CoreResponse;

/// Convert a core response into one Axum/Hyper can serve. Streaming bodies
/// are collected into a buffer; the origin clients in this adapter buffer
/// upstream bodies anyway, and local development does not need incremental
/// flushing.
pub fn into_axum_response(response: CoreResponse) -> Response<AxumBody> {
    let (parts, body) = response.into_parts();
    let body = match body {
        Body::Once(bytes) => AxumBody::from(bytes),
        Body::Stream(stream) => {
            let result = block_on(async {
                let mut buf = Vec::new();
                pin_mut!(stream);
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok::<Vec<u8>, anyhow::Error>(buf)
            });
            match result {
                Ok(buf) => AxumBody::from(buf),
                Err(err) => {
                    error!("streaming response error: {err}");
                    let mut response = Response::builder()
                        .status(StatusCode::INTERNAL_SERVER_ERROR)
                        .body(AxumBody::from("streaming response error"))
                        .expect("error response");
                    response.headers_mut().insert(
                        axum::http::header::CONTENT_TYPE,
                        axum::http::HeaderValue::from_static("text/plain; charset=utf-8"),
                    );
                    return response;
                }
            }
        }
    };

    Response::from_parts(parts, body)
}
