use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every application module
pub fn registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    crate::modules::register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Run the module lifecycle around the HTTP server until shutdown.
///
/// Modules are stopped even when the server exits with an error.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    tracing::info!("shelf-app shutdown complete");
    served
}
