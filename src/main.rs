use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cne=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    cne::run_gui().map_err(|e| anyhow::anyhow!("running GUI: {e}"))
}
