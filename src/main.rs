use anyhow::{anyhow, Context};
use skhaftin::auth::FirebaseTokenVerifier;
use skhaftin::configuration::{get_configuration, Settings};
use skhaftin::push::FcmClient;
use skhaftin::startup::{Application, Dependencies};
use skhaftin::store::UserStore;
use skhaftin::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("skhaftin".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let dependencies = Dependencies {
        store: build_store(&configuration).await?,
        push_provider: Arc::new(
            FcmClient::from_settings(&configuration.firebase.fcm)
                .context("Failed to build the FCM client.")?,
        ),
        verifier: Arc::new(
            FirebaseTokenVerifier::from_settings(&configuration.firebase)
                .context("Failed to build the ID token verifier.")?,
        ),
    };

    let application = Application::build(&configuration, dependencies)
        .await
        .map_err(|e| anyhow!("Failed to build the application: {}", e))?;
    application
        .server
        .launch()
        .await
        .map_err(|e| anyhow!("The server stopped unexpectedly: {}", e))?;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn build_store(configuration: &Settings) -> anyhow::Result<Arc<dyn UserStore>> {
    let store = skhaftin::store::PostgresUserStore::connect(&configuration.database)?;
    store.run_migrations().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_store(_configuration: &Settings) -> anyhow::Result<Arc<dyn UserStore>> {
    tracing::warn!("Built without the `postgres` feature; user records live in memory only");
    Ok(Arc::new(skhaftin::store::InMemoryUserStore::new()))
}
