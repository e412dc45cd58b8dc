use std::sync::Arc;

use web_time::Instant;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::{Request, Response, Uri};
use crate::origin::{ForwardRequest, OriginClient};
use crate::response::IntoResponse;
use crate::route::{RouteClass, RouteTable};

/// The routing shim. Classifies each request path and delegates to one of
/// the two injected origins, synthesizing a response itself for the
/// fallback and failure cases. Holds no mutable state: invocations are
/// independent and may be interleaved freely by the host runtime.
pub struct EdgeRouter {
    table: RouteTable,
    backend_base: String,
    asset: Arc<dyn OriginClient>,
    backend: Arc<dyn OriginClient>,
}

impl Clone for EdgeRouter {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            backend_base: self.backend_base.clone(),
            asset: Arc::clone(&self.asset),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl EdgeRouter {
    pub fn new(
        config: &GatewayConfig,
        asset: Arc<dyn OriginClient>,
        backend: Arc<dyn OriginClient>,
    ) -> Self {
        Self::with_parts(config.route_table(), config.backend_base(), asset, backend)
    }

    pub fn with_parts(
        table: RouteTable,
        backend_base: impl Into<String>,
        asset: Arc<dyn OriginClient>,
        backend: Arc<dyn OriginClient>,
    ) -> Self {
        let backend_base = backend_base.into().trim_end_matches('/').to_string();
        Self {
            table,
            backend_base,
            asset,
            backend,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Produce exactly one response for the request. Total: every failure
    /// is converted into a response here, so callers never observe a fault
    /// originating from the router.
    pub async fn route(&self, request: Request) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let class = self.table.classify(&path);
        let start = Instant::now();

        let response = match self.dispatch(class, request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        };

        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "request method={} path={} class={} status={} elapsed_ms={:.2}",
            method,
            path,
            class.as_str(),
            response.status().as_u16(),
            elapsed
        );
        response
    }

    async fn dispatch(
        &self,
        class: RouteClass,
        request: Request,
    ) -> Result<Response, GatewayError> {
        match class {
            RouteClass::Asset | RouteClass::Root => {
                let forward = ForwardRequest::passthrough(request);
                let response = self.asset.fetch(forward).await?;
                Ok(response.into_response())
            }
            RouteClass::ApiProxy => {
                let target = self.backend_target(request.uri())?;
                let forward = ForwardRequest::to_destination(request, target);
                match self.backend.fetch(forward).await {
                    Ok(response) => Ok(response.into_response()),
                    Err(err) => Err(GatewayError::upstream(err.message())),
                }
            }
            RouteClass::NotFound => Err(GatewayError::not_found(request.uri().path())),
        }
    }

    /// Backend destination: configured base plus the original path and
    /// query, preserved verbatim.
    fn backend_target(&self, uri: &Uri) -> Result<Uri, GatewayError> {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        format!("{}{}", self.backend_base, path_and_query)
            .parse::<Uri>()
            .map_err(GatewayError::internal)
    }
}
