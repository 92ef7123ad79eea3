use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    // Default both workspace crates to info; RUST_LOG still overrides.
    let filter = ["analytics_service=info", "store_client=info"]
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), |f, d| f.add_directive(d));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
