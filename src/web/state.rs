use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::{
    config::{AdminCredential, AppConfig},
    report::mailer::{self, Mailer},
    store::{MemoryStore, PgSubmissionStore, SubmissionStore},
    web::auth::{CredentialVerifier, DenyAll, PasswordHashCredential, SharedSecret},
};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    store: Arc<dyn SubmissionStore>,
    mailer: Arc<dyn Mailer>,
    cron_verifier: Arc<dyn CredentialVerifier>,
    admin_verifier: Option<Arc<dyn CredentialVerifier>>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn SubmissionStore> = match &config.database_url {
            Some(database_url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .acquire_timeout(config.store_timeout)
                    .connect(database_url)
                    .await
                    .context("failed to connect to Postgres")?;

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("failed to run database migrations")?;

                info!("using Postgres submission store");
                Arc::new(PgSubmissionStore::new(pool))
            }
            None => {
                warn!("DATABASE_URL is not set; check-ins are kept in memory and lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let mailer: Arc<dyn Mailer> = Arc::from(
            mailer::from_settings(&config.mail).context("failed to initialize mail transport")?,
        );
        if config.mail.api_url.is_none() {
            warn!("MAIL_API_URL is not set; weekly reports cannot be delivered");
        }

        let cron_verifier: Arc<dyn CredentialVerifier> = match &config.cron_secret {
            Some(secret) => Arc::new(SharedSecret::new(secret.clone())),
            None => {
                warn!("CRON_SECRET is not set; report triggers will be rejected");
                Arc::new(DenyAll)
            }
        };

        let admin_verifier = admin_verifier(&config.admin_credential)?;

        Ok(Self::from_parts(
            config,
            store,
            mailer,
            cron_verifier,
            admin_verifier,
        ))
    }

    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn SubmissionStore>,
        mailer: Arc<dyn Mailer>,
        cron_verifier: Arc<dyn CredentialVerifier>,
        admin_verifier: Option<Arc<dyn CredentialVerifier>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            mailer,
            cron_verifier,
            admin_verifier,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn SubmissionStore {
        self.store.as_ref()
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    pub fn cron_verifier(&self) -> &dyn CredentialVerifier {
        self.cron_verifier.as_ref()
    }

    /// `None` when the admin endpoints are open.
    pub fn admin_verifier(&self) -> Option<&dyn CredentialVerifier> {
        self.admin_verifier.as_deref()
    }
}

fn admin_verifier(credential: &AdminCredential) -> Result<Option<Arc<dyn CredentialVerifier>>> {
    match credential {
        AdminCredential::Open => {
            warn!("no admin credential configured; admin endpoints are open");
            Ok(None)
        }
        AdminCredential::Password(password) => {
            let verifier = PasswordHashCredential::from_plain(password)
                .map_err(|err| anyhow!("failed to hash admin password: {err}"))?;
            Ok(Some(Arc::new(verifier)))
        }
        AdminCredential::PasswordHash(hash) => {
            let verifier = PasswordHashCredential::from_hash(hash.clone())
                .map_err(|err| anyhow!("ADMIN_PASSWORD_HASH is not a valid PHC string: {err}"))?;
            Ok(Some(Arc::new(verifier)))
        }
    }
}
