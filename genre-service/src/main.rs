use genre_service::{config::Settings, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("genre-service", &settings.log);

    tracing::info!("Application: {}", settings.name);
    tracing::info!("Mail Server: {}", settings.mail.host);
    tracing::info!("env: {}", settings.env);

    let application = Application::build(settings).await?;
    application.run_until_stopped().await?;

    Ok(())
}
