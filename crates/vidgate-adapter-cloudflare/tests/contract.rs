#![cfg(all(feature = "cloudflare", target_arch = "wasm32"))]

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use vidgate_adapter_cloudflare::{dispatch, from_core_response, into_core_request};
use vidgate_core::body::Body;
use vidgate_core::error::GatewayError;
use vidgate_core::http::{response_builder, Method, StatusCode};
use vidgate_core::origin::{ForwardRequest, ForwardResponse, OriginClient};
use vidgate_core::route::RouteTable;
use vidgate_core::router::EdgeRouter;
use wasm_bindgen_test::*;
use worker::{
    js_sys::Uint8Array, wasm_bindgen::JsValue, Method as CfMethod, Request as CfRequest,
    RequestInit,
};

wasm_bindgen_test_configure!(run_in_browser);

struct LabeledOrigin(&'static str);

#[async_trait(?Send)]
impl OriginClient for LabeledOrigin {
    async fn fetch(&self, request: ForwardRequest) -> Result<ForwardResponse, GatewayError> {
        let (_, uri, _, body) = request.into_parts();
        let text = format!(
            "{} saw {} body={}",
            self.0,
            uri,
            String::from_utf8_lossy(body.as_bytes())
        );
        Ok(ForwardResponse::new(StatusCode::OK, Body::from(text)))
    }
}

fn test_router() -> EdgeRouter {
    EdgeRouter::with_parts(
        RouteTable::default(),
        "https://backend.example",
        Arc::new(LabeledOrigin("assets")),
        Arc::new(LabeledOrigin("backend")),
    )
}

fn cf_request(method: CfMethod, path: &str, body: Option<&[u8]>) -> CfRequest {
    let mut init = RequestInit::new();
    init.with_method(method);

    let headers = worker::Headers::new().expect("headers");
    headers.set("host", "example.com").expect("host header");
    headers.set("x-vidgate-test", "1").expect("custom header");
    init.with_headers(headers);

    if let Some(bytes) = body {
        let array = Uint8Array::from(bytes);
        init.with_body(Some(JsValue::from(array)));
    }

    let url = format!("https://example.com{}", path);
    CfRequest::new_with_init(&url, &init).expect("cf request")
}

#[wasm_bindgen_test]
async fn into_core_request_preserves_method_uri_headers_and_body() {
    let req = cf_request(CfMethod::Post, "/download?url=abc", Some(b"payload"));

    let core_request = into_core_request(req).await.expect("core request");

    assert_eq!(core_request.method(), &Method::POST);
    assert_eq!(core_request.uri().path(), "/download");
    assert_eq!(core_request.uri().query(), Some("url=abc"));
    assert_eq!(core_request.uri().host(), Some("example.com"));

    let header = core_request
        .headers()
        .get("x-vidgate-test")
        .and_then(|value| value.to_str().ok());
    assert_eq!(header, Some("1"));

    assert_eq!(core_request.body().as_bytes(), b"payload");
}

#[wasm_bindgen_test]
async fn from_core_response_translates_status_headers_and_streaming_body() {
    let response = response_builder()
        .status(StatusCode::OK)
        .header("x-vidgate-res", "1")
        .body(Body::stream(stream::iter(vec![
            Bytes::from_static(b"hello"),
            Bytes::from_static(b" "),
            Bytes::from_static(b"world"),
        ])))
        .expect("response");

    let cf_response = from_core_response(response).expect("cf response");

    assert_eq!(cf_response.status_code(), 200);
    let header = cf_response.headers().get("x-vidgate-res").unwrap();
    assert_eq!(header.as_deref(), Some("1"));

    let bytes = cf_response.bytes().await.expect("bytes");
    assert_eq!(bytes.as_slice(), b"hello world");
}

#[wasm_bindgen_test]
async fn dispatch_sends_static_paths_to_the_asset_origin() {
    let router = test_router();
    let req = cf_request(CfMethod::Get, "/static/app.js", None);

    let response = dispatch(&router, req).await.expect("cf response");

    assert_eq!(response.status_code(), 200);
    let body = response.text().await.expect("text").unwrap();
    assert!(body.starts_with("assets saw https://example.com/static/app.js"));
}

#[wasm_bindgen_test]
async fn dispatch_rewrites_api_paths_onto_the_backend_base() {
    let router = test_router();
    let req = cf_request(CfMethod::Post, "/send_feedback", Some(b"nice tool"));

    let response = dispatch(&router, req).await.expect("cf response");

    assert_eq!(response.status_code(), 200);
    let body = response.text().await.expect("text").unwrap();
    assert!(body.starts_with("backend saw https://backend.example/send_feedback"));
    assert!(body.ends_with("body=nice tool"));
}

#[wasm_bindgen_test]
async fn dispatch_synthesizes_404_for_unknown_paths() {
    let router = test_router();
    let req = cf_request(CfMethod::Get, "/no/such/path", None);

    let response = dispatch(&router, req).await.expect("cf response");

    assert_eq!(response.status_code(), 404);
    let body = response.text().await.expect("text").unwrap();
    assert_eq!(body, "Not Found");
}
