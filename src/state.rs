use crate::auth::jwt::JwtKeys;
use crate::calls::twilio::{CallTrigger, TwilioClient};
use crate::config::AppConfig;
use crate::notify::mailer::{Mailer, SmtpMailer};
use crate::users::repo::{PgUserStore, UserStore};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub jwt: Arc<JwtKeys>,
    pub mailer: Arc<dyn Mailer>,
    pub calls: Arc<dyn CallTrigger>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        run_migrations(&db).await?;

        if config.mail.username.is_empty() || config.mail.password.is_empty() {
            warn!("EMAIL_USER/EMAIL_PASS not set; /email will fail");
        }
        if config.twilio.account_sid.is_empty() || config.twilio.from_number.is_empty() {
            warn!("TWILIO_ACCOUNT_SID/TWILIO_PHONE not set; /call will fail");
        }

        let users = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        let mailer = Arc::new(SmtpMailer::new(&config.mail)?) as Arc<dyn Mailer>;
        let calls = Arc::new(TwilioClient::new(&config.twilio)?) as Arc<dyn CallTrigger>;

        Ok(Self::from_parts(config, users, mailer, calls))
    }

    pub fn from_parts(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        calls: Arc<dyn CallTrigger>,
    ) -> Self {
        let jwt = Arc::new(JwtKeys::new(&config.jwt));
        Self {
            users,
            jwt,
            mailer,
            calls,
        }
    }
}

/// Applies `migrations/`. The users table and its unique email constraint come from here,
/// so a failure stops startup.
pub async fn run_migrations(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")
}
