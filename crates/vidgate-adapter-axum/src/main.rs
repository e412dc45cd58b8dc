fn main() {
    if let Err(err) = vidgate_adapter_axum::run_app(include_str!("../../../vidgate.toml")) {
        eprintln!("vidgate-dev failed: {err}");
        std::process::exit(1);
    }
}
