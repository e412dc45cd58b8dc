use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, redirect, Client};
use vidgate_core::body::Body;
use vidgate_core::error::GatewayError;
use vidgate_core::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use vidgate_core::origin::{ForwardRequest, ForwardResponse, OriginClient};

/// Origin client backed by reqwest. Used twice in the dev server: once for
/// the backend API (the forward request already carries an absolute URL)
/// and once for the asset origin, where the origin-form path is rewritten
/// onto a configured base.
pub struct ReqwestOrigin {
    client: Client,
    rewrite_base: Option<String>,
}

impl ReqwestOrigin {
    pub fn new() -> Self {
        Self {
            client: build_client(),
            rewrite_base: None,
        }
    }

    /// Rewrite every forwarded request onto `base`, keeping the original
    /// path and query.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            rewrite_base: Some(base.into().trim_end_matches('/').to_string()),
        }
    }

    fn target_url(&self, uri: &Uri) -> String {
        match &self.rewrite_base {
            Some(base) => {
                let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
                format!("{base}{path_and_query}")
            }
            None => uri.to_string(),
        }
    }
}

impl Default for ReqwestOrigin {
    fn default() -> Self {
        Self::new()
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .redirect(redirect::Policy::limited(10))
        .build()
        .expect("reqwest client")
}

#[async_trait(?Send)]
impl OriginClient for ReqwestOrigin {
    async fn fetch(&self, request: ForwardRequest) -> Result<ForwardResponse, GatewayError> {
        let (method, uri, headers, body) = request.into_parts();
        let url = self.target_url(&uri);
        let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .map_err(GatewayError::internal)?;
        let mut builder = self.client.request(method, url);

        for (name, value) in headers.iter() {
            let header_name = header::HeaderName::from_bytes(name.as_str().as_bytes())
                .map_err(GatewayError::internal)?;
            let header_value = header::HeaderValue::from_bytes(value.as_bytes())
                .map_err(GatewayError::internal)?;
            builder = builder.header(header_name, header_value);
        }

        builder = match body {
            Body::Once(bytes) => builder.body(bytes.to_vec()),
            Body::Stream(mut stream) => {
                let mut buf = Vec::new();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk.map_err(GatewayError::internal)?;
                    buf.extend_from_slice(&chunk);
                }
                builder.body(buf)
            }
        };

        let response = builder.send().await.map_err(GatewayError::internal)?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(GatewayError::internal)?;
        let mut origin_response = ForwardResponse::new(status, Body::empty());

        for (name, value) in response.headers().iter() {
            let header_name = HeaderName::from_bytes(name.as_str().as_bytes())
                .map_err(GatewayError::internal)?;
            let header_value =
                HeaderValue::from_bytes(value.as_bytes()).map_err(GatewayError::internal)?;
            origin_response
                .headers_mut()
                .insert(header_name, header_value);
        }

        let bytes = response.bytes().await.map_err(GatewayError::internal)?;
        *origin_response.body_mut() = Body::from(bytes.to_vec());

        Ok(origin_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_client_keeps_the_forward_url() {
        let origin = ReqwestOrigin::new();
        let uri = Uri::from_static("https://backend.example/download?x=1");
        assert_eq!(origin.target_url(&uri), "https://backend.example/download?x=1");
    }

    #[test]
    fn rewriting_client_moves_path_and_query_onto_the_base() {
        let origin = ReqwestOrigin::with_base("http://127.0.0.1:8788/");
        let uri = Uri::from_static("/static/app.css?v=2");
        assert_eq!(
            origin.target_url(&uri),
            "http://127.0.0.1:8788/static/app.css?v=2"
        );
    }

    #[test]
    fn rewriting_client_defaults_missing_paths_to_root() {
        let origin = ReqwestOrigin::with_base("http://127.0.0.1:8788");
        let uri = Uri::from_static("http://ignored.example");
        assert_eq!(origin.target_url(&uri), "http://127.0.0.1:8788/");
    }
}
