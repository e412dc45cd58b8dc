//! Cloudflare Workers adapter: the production deployment target. Routing
//! happens in `vidgate-core`; this crate converts between worker and core
//! request types and performs origin fetches through the platform's
//! `fetch`.

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod request;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod response;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod upstream;

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use request::{dispatch, into_core_request};
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use response::from_core_response;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use upstream::FetchOrigin;

/// Workers route `console.log` output to the dashboard already; nothing to
/// install. Kept so adapter entry points read the same on every platform.
pub fn init_logger() -> Result<(), log::SetLoggerError> {
    Ok(())
}

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub async fn run_app(
    manifest_src: &str,
    req: worker::Request,
    _env: worker::Env,
    _ctx: worker::Context,
) -> Result<worker::Response, worker::Error> {
    use std::sync::Arc;
    use vidgate_core::config::ConfigLoader;
    use vidgate_core::router::EdgeRouter;

    init_logger().ok();

    let loader = ConfigLoader::load_from_str(manifest_src);
    // Asset requests keep their original same-origin URL, so one fetch
    // client serves both sides.
    let router = EdgeRouter::new(
        loader.config(),
        Arc::new(FetchOrigin),
        Arc::new(FetchOrigin),
    );
    dispatch(&router, req).await
}

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
#[worker::event(fetch)]
pub async fn fetch(
    req: worker::Request,
    env: worker::Env,
    ctx: worker::Context,
) -> Result<worker::Response, worker::Error> {
    run_app(include_str!("../../../vidgate.toml"), req, env, ctx).await
}
