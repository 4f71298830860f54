use crate::auth::IdTokenVerifier;
use crate::catchers::*;
use crate::configuration::Settings;
use crate::dispatch::NotificationService;
use crate::port_saver;
use crate::port_saver::Port;
use crate::push::PushProvider;
use crate::routes::*;
use crate::store::UserStore;
use rocket::config::LogLevel;
use rocket::{Build, Config, Ignite, Rocket};
use std::sync::Arc;

/// The collaborators the server talks to. Tests swap these for fakes.
#[derive(Clone)]
pub struct Dependencies {
    pub store: Arc<dyn UserStore>,
    pub push_provider: Arc<dyn PushProvider>,
    pub verifier: Arc<dyn IdTokenVerifier>,
}

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        dependencies: Dependencies,
    ) -> Result<Application, rocket::Error> {
        let (port_saver, port) = port_saver::create_pair();
        let server = rocket(configuration, dependencies)
            .attach(port_saver)
            .ignite()
            .await?;
        Ok(Application { server, port })
    }
}

pub fn rocket(configuration: &Settings, dependencies: Dependencies) -> Rocket<Build> {
    let notification_service = Arc::new(NotificationService::new(
        dependencies.store.clone(),
        dependencies.push_provider,
    ));

    rocket::custom(Config {
        address: configuration.application.host,
        port: configuration.application.port.unwrap_or(0),
        log_level: LogLevel::Off,
        ..Config::default()
    })
    .manage(dependencies.store)
    .manage(dependencies.verifier)
    .manage(notification_service)
    .manage(configuration.operator.clone())
    .mount(
        "/",
        routes![
            crate::routes::health::health,
            get_profile,
            update_profile,
            update_fcm_token,
            get_preferences,
            update_preferences,
            send_test_notification,
            broadcast_daily_reminders,
        ],
    )
    .register(
        "/",
        catchers![
            bad_request,
            crate::catchers::unauthorized::unauthorized,
            crate::catchers::not_found::not_found,
            unprocessable_entity_to_bad_request,
            internal_error,
        ],
    )
}
