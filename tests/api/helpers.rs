use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use secrecy::Secret;
use skhaftin::auth::{AuthError, IdTokenVerifier, VerifiedUser};
use skhaftin::configuration::get_configuration;
use skhaftin::domain::{
    NotificationPreferences, PreferencesUpdate, ProfileUpdate, PushMessage, PushToken, UserId,
    UserRecord,
};
use skhaftin::push::{MessageId, PushError, PushProvider};
use skhaftin::startup::{Application, Dependencies};
use skhaftin::store::{InMemoryUserStore, StoreError, UserStore};
use skhaftin::telemetry::{get_subscriber, init_subscriber};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Accepts `token-<uid>` as an ID token for `<uid>`. `outage` simulates the
/// identity provider being down.
pub struct FakeVerifier;

#[async_trait]
impl IdTokenVerifier for FakeVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedUser, AuthError> {
        if id_token == "outage" {
            return Err(AuthError::UnexpectedError(anyhow::anyhow!(
                "identity provider unavailable"
            )));
        }
        let uid = id_token
            .strip_prefix("token-")
            .ok_or(AuthError::InvalidToken)?;
        let user_id = UserId::parse(uid.to_string()).map_err(|_| AuthError::InvalidToken)?;
        Ok(VerifiedUser {
            email: Some(format!("{}@example.com", uid)),
            user_id,
        })
    }
}

/// Records every message; tokens starting with `stale` are refused.
#[derive(Default)]
pub struct FakePushProvider {
    pub sent: Mutex<Vec<PushMessage>>,
}

#[async_trait]
impl PushProvider for FakePushProvider {
    async fn send(&self, message: &PushMessage) -> Result<MessageId, PushError> {
        self.sent.lock().unwrap().push(message.clone());
        if message.token.as_ref().starts_with("stale") {
            return Err(PushError::Rejected {
                status: 404,
                body: "UNREGISTERED".into(),
            });
        }
        Ok(MessageId(format!("projects/test/messages/{}", Uuid::new_v4())))
    }
}

/// A user store whose backend is unreachable.
pub struct FailingUserStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

#[async_trait]
impl UserStore for FailingUserStore {
    async fn get_user(&self, _: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Err(unavailable())
    }

    async fn upsert_push_token(&self, _: &UserId, _: &PushToken) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn upsert_profile(&self, _: &UserId, _: ProfileUpdate) -> Result<UserRecord, StoreError> {
        Err(unavailable())
    }

    async fn update_preferences(
        &self,
        _: &UserId,
        _: PreferencesUpdate,
    ) -> Result<NotificationPreferences, StoreError> {
        Err(unavailable())
    }

    async fn users_with_push_token(&self) -> Result<Vec<UserRecord>, StoreError> {
        Err(unavailable())
    }
}

pub struct TestOperator {
    pub username: String,
    pub password: String,
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<dyn UserStore>,
    pub push_provider: Arc<FakePushProvider>,
    pub operator: TestOperator,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_fcm_token(&self, id_token: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/update-fcm-token", &self.address))
            .bearer_auth(id_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_profile(&self, id_token: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/profile", &self.address))
            .bearer_auth(id_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_profile(&self, id_token: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .put(&format!("{}/api/profile", &self.address))
            .bearer_auth(id_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_preferences(&self, id_token: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/notification-preferences", &self.address))
            .bearer_auth(id_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_preferences(
        &self,
        id_token: &str,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .put(&format!("{}/api/notification-preferences", &self.address))
            .bearer_auth(id_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn send_test_notification(
        &self,
        id_token: &str,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/notifications/send-test", &self.address))
            .bearer_auth(id_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn broadcast_daily_reminders(&self) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/notifications/daily-reminders", &self.address))
            .basic_auth(&self.operator.username, Some(&self.operator.password))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Stores `token` for `uid` directly, bypassing the HTTP surface.
    pub async fn seed_token(&self, uid: &str, token: &str) {
        self.store
            .upsert_push_token(
                &UserId::parse(uid.to_string()).unwrap(),
                &PushToken::parse(token.to_string()).unwrap(),
            )
            .await
            .unwrap();
    }

    pub fn sent_messages(&self) -> Vec<PushMessage> {
        self.push_provider.sent.lock().unwrap().clone()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_store(Arc::new(InMemoryUserStore::new())).await
}

pub async fn spawn_app_with_store(store: Arc<dyn UserStore>) -> TestApp {
    Lazy::force(&TRACING);

    let operator = TestOperator {
        username: "operator".into(),
        password: Uuid::new_v4().to_string(),
    };
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = Some(0);
        c.operator.username = operator.username.clone();
        c.operator.password_hash = Secret::new(hash_password(&operator.password));
        c
    };

    let push_provider = Arc::new(FakePushProvider::default());
    let dependencies = Dependencies {
        store: store.clone(),
        push_provider: push_provider.clone(),
        verifier: Arc::new(FakeVerifier),
    };

    let app = Application::build(&configuration, dependencies)
        .await
        .expect("Failed to build application.");
    let port = app.port.clone();
    let _ = tokio::spawn(app.server.launch());
    let port = port.get().await.expect("The server never lifted off.");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        store,
        push_provider,
        operator,
        api_client: reqwest::Client::new(),
    }
}

fn hash_password(password: &str) -> String {
    let salt = SaltString::new(&Uuid::new_v4().to_simple().to_string()).unwrap();
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}
