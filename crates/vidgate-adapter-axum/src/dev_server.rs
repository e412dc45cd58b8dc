use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use simple_logger::SimpleLogger;
use tokio::runtime::Builder as RuntimeBuilder;
use tokio::signal;
use tower::{service_fn, Service};

use vidgate_core::config::ConfigLoader;
use vidgate_core::router::EdgeRouter;

use crate::service::VidgateAxumService;
use crate::upstream::ReqwestOrigin;

/// Asset origin used when the deploy manifest does not name one. Matches
/// the default port of `wrangler dev --local` style asset servers.
pub const DEFAULT_DEV_ASSET_BASE: &str = "http://127.0.0.1:8788";

/// Configuration for the local dev server.
#[derive(Clone)]
pub struct AxumDevServerConfig {
    pub addr: SocketAddr,
    pub enable_ctrl_c: bool,
}

impl Default for AxumDevServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            enable_ctrl_c: true,
        }
    }
}

/// Blocking dev server runner used by the `vidgate-dev` binary.
pub struct AxumDevServer {
    router: EdgeRouter,
    config: AxumDevServerConfig,
}

impl AxumDevServer {
    pub fn new(router: EdgeRouter) -> Self {
        Self {
            router,
            config: AxumDevServerConfig::default(),
        }
    }

    pub fn with_config(router: EdgeRouter, config: AxumDevServerConfig) -> Self {
        Self { router, config }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;

        runtime.block_on(async move { self.run_async().await })
    }

    async fn run_async(self) -> anyhow::Result<()> {
        let AxumDevServer { router, config } = self;

        // Bind via std first so address errors surface before the runtime
        // starts serving.
        let listener = StdTcpListener::bind(config.addr)
            .with_context(|| format!("failed to bind dev server to {}", config.addr))?;
        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;

        let listener = tokio::net::TcpListener::from_std(listener)
            .context("failed to adopt std listener into tokio")?;

        serve_with_listener(router, listener, config.enable_ctrl_c).await
    }

    #[cfg(test)]
    async fn run_with_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let AxumDevServer { router, config } = self;
        serve_with_listener(router, listener, config.enable_ctrl_c).await
    }
}

async fn serve_with_listener(
    router: EdgeRouter,
    listener: tokio::net::TcpListener,
    enable_ctrl_c: bool,
) -> anyhow::Result<()> {
    let service = VidgateAxumService::new(router);
    let router = Router::new().fallback_service(service_fn(move |req| {
        let mut svc = service.clone();
        async move { svc.call(req).await }
    }));
    let make_service = router.into_make_service_with_connect_info::<SocketAddr>();

    let shutdown = if enable_ctrl_c {
        Some(async {
            let _ = signal::ctrl_c().await;
        })
    } else {
        None
    };

    let server = axum::serve(listener, make_service);
    if let Some(shutdown) = shutdown {
        let server = server.with_graceful_shutdown(shutdown);
        server.await.context("axum server error")?;
    } else {
        server.await.context("axum server error")?;
    }

    Ok(())
}

/// Build a router from the given deploy manifest, wiring reqwest-backed
/// origin clients for both sides.
pub fn router_from_manifest(manifest_src: &str) -> EdgeRouter {
    let loader = ConfigLoader::load_from_str(manifest_src);
    let config = loader.config();

    let asset_base = config
        .origins
        .asset_base
        .clone()
        .unwrap_or_else(|| DEFAULT_DEV_ASSET_BASE.to_string());

    EdgeRouter::new(
        config,
        Arc::new(ReqwestOrigin::with_base(asset_base)),
        Arc::new(ReqwestOrigin::new()),
    )
}

/// Entry point for the `vidgate-dev` binary: parse the manifest, set up
/// logging, and serve until ctrl-c.
pub fn run_app(manifest_src: &str) -> anyhow::Result<()> {
    let loader = ConfigLoader::load_from_str(manifest_src);
    let level = loader.config().level_filter();

    SimpleLogger::new().with_level(level).init().ok();

    let router = router_from_manifest(manifest_src);
    AxumDevServer::new(router).run()
}
