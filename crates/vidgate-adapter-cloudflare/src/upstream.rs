use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use vidgate_core::body::Body;
use vidgate_core::error::GatewayError;
use vidgate_core::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use vidgate_core::origin::{ForwardRequest, ForwardResponse, OriginClient};
use worker::{
    wasm_bindgen::JsValue, Body as WorkerBody, Fetch, Headers, Method as CfMethod,
    Request as CfRequest, RequestInit, RequestRedirect, Response as CfResponse,
};

/// Origin client backed by the Workers `fetch` API. Serves both sides of
/// the router: asset forwards keep the request's original same-origin URL,
/// backend forwards arrive with the URL already rewritten. Redirects are
/// followed inside the fetch, so clients see only the final response.
pub struct FetchOrigin;

#[async_trait(?Send)]
impl OriginClient for FetchOrigin {
    async fn fetch(&self, request: ForwardRequest) -> Result<ForwardResponse, GatewayError> {
        let (method, uri, headers, body) = request.into_parts();
        let cf_request = build_cf_request(method, &uri, headers, body)?;
        let mut cf_response = Fetch::Request(cf_request)
            .send()
            .await
            .map_err(worker_to_gateway)?;
        convert_response(&mut cf_response)
    }
}

fn build_cf_request(
    method: Method,
    uri: &Uri,
    headers: HeaderMap,
    body: Body,
) -> Result<CfRequest, GatewayError> {
    let mut init = RequestInit::new();
    init.with_method(core_method_to_cf(method));
    init.with_headers(Headers::from(&headers));
    init.with_redirect(RequestRedirect::Follow);

    attach_body(&mut init, body)?;

    CfRequest::new_with_init(&uri.to_string(), &init).map_err(worker_to_gateway)
}

fn attach_body(init: &mut RequestInit, body: Body) -> Result<(), GatewayError> {
    match body {
        Body::Once(bytes) => {
            if bytes.is_empty() {
                return Ok(());
            }
            let chunk = bytes.to_vec();
            let stream = stream::once(async move { Ok::<Vec<u8>, JsValue>(chunk) }).boxed_local();
            let worker_body = WorkerBody::from_stream(stream)
                .map_err(|err| GatewayError::internal(anyhow::anyhow!(err.to_string())))?;
            if let Some(readable) = worker_body.into_inner() {
                init.with_body(Some(JsValue::from(readable)));
            }
        }
        Body::Stream(stream) => {
            let mapped = stream
                .map(|res| match res {
                    Ok(bytes) => Ok::<Vec<u8>, JsValue>(bytes.to_vec()),
                    Err(err) => Err(JsValue::from_str(&err.to_string())),
                })
                .boxed_local();
            let worker_body = WorkerBody::from_stream(mapped)
                .map_err(|err| GatewayError::internal(anyhow::anyhow!(err.to_string())))?;
            if let Some(readable) = worker_body.into_inner() {
                init.with_body(Some(JsValue::from(readable)));
            }
        }
    }

    Ok(())
}

fn convert_response(cf_response: &mut CfResponse) -> Result<ForwardResponse, GatewayError> {
    let status =
        StatusCode::from_u16(cf_response.status_code()).map_err(GatewayError::internal)?;
    let mut forward_response = ForwardResponse::new(status, Body::empty());

    for (name, value) in cf_response.headers().entries() {
        if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) {
            if let Ok(header_value) = HeaderValue::from_str(&value) {
                forward_response
                    .headers_mut()
                    .insert(header_name, header_value);
            }
        }
    }

    let worker_stream = cf_response.stream().map_err(worker_to_gateway)?;
    let body_stream = worker_stream.map(|res| {
        res.map(Bytes::from)
            .map_err(|err| anyhow::anyhow!(err.to_string()))
    });
    *forward_response.body_mut() = Body::from_stream(body_stream);

    Ok(forward_response)
}

fn core_method_to_cf(method: Method) -> CfMethod {
    match method {
        Method::GET => CfMethod::Get,
        Method::POST => CfMethod::Post,
        Method::PUT => CfMethod::Put,
        Method::PATCH => CfMethod::Patch,
        Method::DELETE => CfMethod::Delete,
        Method::HEAD => CfMethod::Head,
        Method::OPTIONS => CfMethod::Options,
        Method::CONNECT => CfMethod::Connect,
        Method::TRACE => CfMethod::Trace,
        _ => CfMethod::Get,
    }
}

fn worker_to_gateway(err: worker::Error) -> GatewayError {
    GatewayError::internal(anyhow::anyhow!(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn core_methods_map_onto_worker_methods() {
        assert_eq!(core_method_to_cf(Method::GET), CfMethod::Get);
        assert_eq!(core_method_to_cf(Method::POST), CfMethod::Post);
        assert_eq!(core_method_to_cf(Method::DELETE), CfMethod::Delete);
    }

    #[wasm_bindgen_test]
    fn empty_bodies_leave_the_init_without_a_body() {
        let mut init = RequestInit::new();
        attach_body(&mut init, Body::empty()).expect("attach");
        assert!(init.body.is_none());
    }
}
