//! Axum adapter: runs the vidgate router as a local dev server, with
//! reqwest-backed origin clients standing in for the edge platform's fetch.

mod dev_server;
mod request;
mod response;
mod service;
mod upstream;

pub use dev_server::{
    router_from_manifest, run_app, AxumDevServer, AxumDevServerConfig, DEFAULT_DEV_ASSET_BASE,
};
pub use request::into_core_request;
pub use response::into_axum_response;
pub use service::VidgateAxumService;
pub use upstream::ReqwestOrigin;
