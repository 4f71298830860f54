use crate::client::{ApiError, BackendApi, FileKeyValueStore, HttpBackendClient, LocalPrefs};
use crate::configuration::ClientSettings;
use crate::domain::PushToken;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(2000);

type Backoff = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// How many times to send a token and how long to wait after each failure.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Waits `base_delay * attempt` after the given failed attempt.
    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self::with_backoff(max_attempts, move |attempt| base_delay * attempt)
    }

    pub fn with_backoff<F>(max_attempts: u32, backoff: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(backoff),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        (self.backoff)(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered { attempts: u32 },
    /// Every attempt failed with a retryable error. The token stays stored
    /// locally for the next trigger.
    GaveUp { attempts: u32 },
    /// The backend refused the request itself; sending it again won't help.
    Rejected { status: Option<u16> },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("The backend did not accept the session credentials")]
    Unauthorized,
}

/// Delivers push tokens to the backend at least once, retrying transient
/// failures with backoff.
pub struct TokenRegistrar {
    api: Arc<dyn BackendApi>,
    prefs: LocalPrefs,
    policy: RetryPolicy,
    sleep: Arc<dyn Sleep>,
}

impl TokenRegistrar {
    pub fn new(api: Arc<dyn BackendApi>, prefs: LocalPrefs) -> Self {
        Self {
            api,
            prefs,
            policy: RetryPolicy::default(),
            sleep: Arc::new(TokioSleep),
        }
    }

    /// Wires a registrar backed by the prefs file and HTTP backend named in
    /// `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, anyhow::Error> {
        let store = FileKeyValueStore::open(&settings.storage_path)?;
        let prefs = LocalPrefs::new(Arc::new(store));
        let api = HttpBackendClient::new(
            settings.backend_url.clone(),
            prefs.clone(),
            settings.timeout(),
        )?;
        Ok(Self::new(Arc::new(api), prefs).with_policy(RetryPolicy::linear(
            settings.max_retries,
            settings.base_delay(),
        )))
    }

    pub fn prefs(&self) -> &LocalPrefs {
        &self.prefs
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleep(mut self, sleep: Arc<dyn Sleep>) -> Self {
        self.sleep = sleep;
        self
    }

    /// Persists `token`, then sends it until it is accepted, refused, or the
    /// attempt budget runs out.
    #[tracing::instrument(name = "Registering a push token", skip(self, token))]
    pub async fn register(
        &self,
        token: PushToken,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        if let Err(e) = self.prefs.save_fcm_token(&token) {
            tracing::warn!(error = ?e, "Failed to persist the push token locally");
        }

        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;
        loop {
            tracing::debug!(attempt, max_attempts, "Sending the push token");
            match self.api.update_fcm_token(&token).await {
                Ok(()) => {
                    tracing::info!(attempt, "Push token saved by the backend");
                    self.refresh_preferences().await;
                    return Ok(RegistrationOutcome::Registered { attempts: attempt });
                }
                Err(ApiError::Unauthorized) => return Err(RegistrationError::Unauthorized),
                Err(e) if e.is_retryable() => {
                    if attempt >= max_attempts {
                        tracing::error!(error = %e, attempt, "Giving up on the push token");
                        return Ok(RegistrationOutcome::GaveUp { attempts: attempt });
                    }
                    let delay = self.policy.delay_for_attempt(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        ?delay,
                        "Failed to send the push token, will retry"
                    );
                    self.sleep.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "The backend refused the push token");
                    return Ok(RegistrationOutcome::Rejected { status: e.status() });
                }
            }
        }
    }

    /// Runs `register` on its own task.
    pub fn spawn(
        self: &Arc<Self>,
        token: PushToken,
    ) -> JoinHandle<Result<RegistrationOutcome, RegistrationError>> {
        let registrar = Arc::clone(self);
        tokio::spawn(async move { registrar.register(token).await })
    }

    /// The provider issued a new token. Sequences already in flight keep
    /// running; the backend keeps whichever write lands last.
    pub fn on_new_token(
        self: &Arc<Self>,
        token: PushToken,
    ) -> Option<JoinHandle<Result<RegistrationOutcome, RegistrationError>>> {
        if !self.prefs.is_user_logged_in() {
            // `register` persists the token itself; without a session it is
            // only kept for later.
            if let Err(e) = self.prefs.save_fcm_token(&token) {
                tracing::warn!(error = ?e, "Failed to persist the push token locally");
            }
            tracing::debug!("No signed-in user, the token will be sent after login");
            return None;
        }
        Some(self.spawn(token))
    }

    /// Re-sends the stored token, if any, for a signed-in user.
    pub fn on_foreground(
        self: &Arc<Self>,
    ) -> Option<JoinHandle<Result<RegistrationOutcome, RegistrationError>>> {
        if !self.prefs.is_user_logged_in() {
            return None;
        }
        let token = self.prefs.fcm_token()?;
        Some(self.spawn(token))
    }

    async fn refresh_preferences(&self) {
        match self.api.notification_preferences().await {
            Ok(preferences) => {
                if let Err(e) = self.prefs.save_notification_preferences(&preferences) {
                    tracing::warn!(error = ?e, "Failed to store notification preferences");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to fetch notification preferences"),
        }
    }
}
