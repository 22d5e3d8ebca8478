use pawprints::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("pawprints".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration()?;
    let app = Application::build(config).await?;

    tracing::info!("Listening on {}", app.local_addr());
    app.run_until_stopped().await?;

    Ok(())
}
