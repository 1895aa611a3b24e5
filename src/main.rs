use anyhow::Result;
use hescore_lookup::{generate_knee_wall_table, GeneratorConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) fixed locations next to the crate ───────────────────────
    let config = GeneratorConfig::default();
    info!(
        schema = %config.schema_path.display(),
        output = %config.output_path.display(),
        "startup"
    );

    // ─── 3) schema → R-values → table ───────────────────────────────
    let records = generate_knee_wall_table(&config)?;

    info!("all done ({} assemblies)", records.len());
    Ok(())
}
