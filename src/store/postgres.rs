use crate::configuration::DatabaseSettings;
use crate::domain::{
    NotificationPreferences, PreferencesUpdate, ProfileUpdate, PushToken, UserId, UserRecord,
};
use crate::models::{PreferenceChanges, ProfileChanges, User};
use crate::schema::users;
use crate::store::{StoreError, UserStore};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use secrecy::ExposeSecret;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let manager =
            ConnectionManager::<PgConnection>::new(settings.connection_string().expose_secret());
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    #[tracing::instrument(name = "Running pending database migrations", skip(self))]
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        self.run(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|_| ())
                .map_err(|e| anyhow!(e.to_string()))
        })
        .await
    }

    async fn run<F, T>(&self, query: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, anyhow::Error> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            query(&mut conn).map_err(|e| {
                tracing::error!("Failed to execute query: {:?}", e);
                StoreError::from(e)
            })
        })
        .await
        .context("The blocking query task did not complete.")?
    }
}

fn insert_if_missing(conn: &mut PgConnection, user_id: &str) -> QueryResult<usize> {
    let now = Utc::now();
    diesel::insert_into(users::table)
        .values((
            users::user_id.eq(user_id),
            users::created_at.eq(now),
            users::updated_at.eq(now),
        ))
        .on_conflict(users::user_id)
        .do_nothing()
        .execute(conn)
}

fn load_record(conn: &mut PgConnection, user_id: &str) -> Result<UserRecord, anyhow::Error> {
    let row = users::table
        .find(user_id)
        .select(User::as_select())
        .first::<User>(conn)
        .context("Failed to load the user row.")?;
    row.try_into()
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Fetching a user record", skip(self))]
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        let id = user_id.as_ref().to_string();
        self.run(move |conn| {
            users::table
                .find(id.as_str())
                .select(User::as_select())
                .first::<User>(conn)
                .optional()
                .context("Failed to perform a query to fetch the user.")?
                .map(UserRecord::try_from)
                .transpose()
        })
        .await
    }

    #[tracing::instrument(name = "Saving a push token", skip(self, token))]
    async fn upsert_push_token(
        &self,
        user_id: &UserId,
        token: &PushToken,
    ) -> Result<(), StoreError> {
        let id = user_id.as_ref().to_string();
        let token = token.as_ref().to_string();
        self.run(move |conn| {
            let now = Utc::now();
            diesel::insert_into(users::table)
                .values((
                    users::user_id.eq(id.as_str()),
                    users::fcm_token.eq(token.as_str()),
                    users::created_at.eq(now),
                    users::updated_at.eq(now),
                ))
                .on_conflict(users::user_id)
                .do_update()
                .set((users::fcm_token.eq(token.as_str()), users::updated_at.eq(now)))
                .execute(conn)
                .context("Failed to upsert the push token.")?;
            Ok(())
        })
        .await
    }

    #[tracing::instrument(name = "Updating a user profile", skip(self, update))]
    async fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserRecord, StoreError> {
        let id = user_id.as_ref().to_string();
        self.run(move |conn| {
            conn.transaction(|conn| {
                insert_if_missing(conn, &id)?;
                let changes = ProfileChanges {
                    email: update.email.as_deref(),
                    username: update.username.as_deref(),
                    location: update.location.as_deref(),
                };
                diesel::update(users::table.find(id.as_str()))
                    .set((changes, users::updated_at.eq(Utc::now())))
                    .execute(conn)
                    .map(|_| ())
            })
            .context("Failed to update the user profile.")?;
            load_record(conn, &id)
        })
        .await
    }

    #[tracing::instrument(name = "Updating notification preferences", skip(self, update))]
    async fn update_preferences(
        &self,
        user_id: &UserId,
        update: PreferencesUpdate,
    ) -> Result<NotificationPreferences, StoreError> {
        let id = user_id.as_ref().to_string();
        self.run(move |conn| {
            conn.transaction(|conn| {
                insert_if_missing(conn, &id)?;
                let changes = PreferenceChanges {
                    daily_reminders: update.daily_reminders,
                    food_updates: update.food_updates,
                    test_notifications: update.test_notifications,
                };
                diesel::update(users::table.find(id.as_str()))
                    .set((changes, users::updated_at.eq(Utc::now())))
                    .execute(conn)
                    .map(|_| ())
            })
            .context("Failed to update notification preferences.")?;
            Ok(load_record(conn, &id)?.notification_preferences)
        })
        .await
    }

    #[tracing::instrument(name = "Get users with a push token", skip(self))]
    async fn users_with_push_token(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.run(|conn| {
            let rows = users::table
                .filter(users::fcm_token.is_not_null())
                .filter(users::fcm_token.ne(""))
                .select(User::as_select())
                .load::<User>(conn)
                .context("Failed to fetch users holding a push token.")?;
            let records = rows
                .into_iter()
                .filter_map(|row| match UserRecord::try_from(row) {
                    Ok(record) => Some(record),
                    Err(error) => {
                        tracing::warn!(error.cause_chain = ?error,
                            "Skipping a user. Their stored push token is invalid",
                        );
                        None
                    }
                })
                .collect();
            Ok(records)
        })
        .await
    }
}
