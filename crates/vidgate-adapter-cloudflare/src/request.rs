use vidgate_core::body::Body;
use vidgate_core::error::GatewayError;
use vidgate_core::http::{request_builder, Method as CoreMethod, Request, Uri};
use vidgate_core::router::EdgeRouter;
use worker::{Error as WorkerError, Method, Request as CfRequest, Response as CfResponse};

use crate::response::from_core_response;

pub async fn into_core_request(mut req: CfRequest) -> Result<Request, GatewayError> {
    let method = into_core_method(req.method());
    let url = req
        .url()
        .map_err(|err| GatewayError::internal(anyhow::anyhow!("invalid URL: {err}")))?;
    // The absolute worker URL, not just the path: asset passthrough sends
    // it to `fetch` unchanged.
    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|err| GatewayError::internal(anyhow::anyhow!("invalid URI: {err}")))?;

    let mut builder = request_builder().method(method).uri(uri);
    let headers = req.headers();
    for (name, value) in headers.entries() {
        builder = builder.header(name.as_str(), value);
    }

    let bytes = req
        .bytes()
        .await
        .map_err(|err| GatewayError::internal(anyhow::anyhow!(err.to_string())))?;

    builder
        .body(Body::from(bytes))
        .map_err(GatewayError::internal)
}

/// Run one worker request through the router and convert the result back.
pub async fn dispatch(router: &EdgeRouter, req: CfRequest) -> Result<CfResponse, WorkerError> {
    let core_request = into_core_request(req).await.map_err(gateway_error_to_worker)?;
    let response = router.route(core_request).await;
    from_core_response(response).map_err(gateway_error_to_worker)
}

fn gateway_error_to_worker(err: GatewayError) -> WorkerError {
    WorkerError::RustError(err.to_string())
}

fn into_core_method(method: Method) -> CoreMethod {
    CoreMethod::from_bytes(method.as_ref().as_bytes()).unwrap_or(CoreMethod::GET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn into_core_method_maps_known_methods() {
        assert_eq!(into_core_method(Method::Get), CoreMethod::GET);
        assert_eq!(into_core_method(Method::Post), CoreMethod::POST);
        assert_eq!(into_core_method(Method::Put), CoreMethod::PUT);
        assert_eq!(into_core_method(Method::Delete), CoreMethod::DELETE);
    }

    #[wasm_bindgen_test]
    fn into_core_method_defaults_unknown_to_get() {
        let method = Method::from("FOO".to_string());
        assert_eq!(into_core_method(method), CoreMethod::GET);
    }
}
