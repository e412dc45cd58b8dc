use std::fmt;

use async_trait::async_trait;

use crate::body::Body;
use crate::error::GatewayError;
use crate::http::{response_builder, HeaderMap, Method, Request, Response, StatusCode, Uri};

/// Outbound request handed to an origin client. Built by consuming the
/// inbound request, so the platform's copy is never mutated in place: a
/// passthrough keeps the original destination, a proxy forward carries a
/// rewritten one.
pub struct ForwardRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
}

impl ForwardRequest {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// Forward to a new destination with method, headers, and body copied
    /// verbatim from the request.
    pub fn to_destination(request: Request, uri: Uri) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri,
            headers: parts.headers,
            body,
        }
    }

    /// Forward unchanged, keeping the request's own destination.
    pub fn passthrough(request: Request) -> Self {
        let uri = request.uri().clone();
        Self::to_destination(request, uri)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn into_parts(self) -> (Method, Uri, HeaderMap, Body) {
        (self.method, self.uri, self.headers, self.body)
    }
}

impl fmt::Debug for ForwardRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardRequest")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("headers", &self.headers)
            .finish()
    }
}

/// Response received from an origin, convertible back into the gateway's
/// response type without touching status, headers, or body.
pub struct ForwardResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl ForwardResponse {
    pub fn new(status: StatusCode, body: Body) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn into_response(self) -> Response {
        let mut builder = response_builder().status(self.status);
        for (name, value) in self.headers.iter() {
            builder = builder.header(name, value);
        }
        builder
            .body(self.body)
            .expect("origin response builder should not fail")
    }
}

impl fmt::Debug for ForwardResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardResponse")
            .field("status", &self.status)
            .finish()
    }
}

/// The single capability the router needs from the outside world: perform
/// an HTTP fetch and return a response or a transport error. Injected
/// twice, once for the asset origin and once for the backend API, so both
/// can be mocked in tests.
#[async_trait(?Send)]
pub trait OriginClient: Send + Sync {
    async fn fetch(&self, request: ForwardRequest) -> Result<ForwardResponse, GatewayError>;
}
