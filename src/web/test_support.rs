use std::{collections::HashMap, sync::Arc};

use axum::response::Response;
use serde_json::Value;

use crate::{
    config::AppConfig,
    report::mailer::testing::RecordingMailer,
    store::{MemoryStore, SubmissionStore, testing::FailingStore},
    web::{
        AppState,
        auth::{CredentialVerifier, PasswordHashCredential, SharedSecret},
    },
};

pub const TEST_CRON_SECRET: &str = "test-cron-secret";
pub const TEST_ADMIN_PASSWORD: &str = "test-admin-password";

fn test_config() -> AppConfig {
    let env: HashMap<&str, &str> = HashMap::from([
        ("CRON_SECRET", TEST_CRON_SECRET),
        ("REPORT_RECIPIENT", "reports@example.com"),
    ]);
    AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap()
}

/// State with open admin endpoints and the test cron secret.
pub fn test_state(store: Arc<MemoryStore>, mailer: Arc<RecordingMailer>) -> AppState {
    open_state(store, mailer)
}

/// Like [`test_state`], but every store call fails.
pub fn failing_state(mailer: Arc<RecordingMailer>) -> AppState {
    open_state(Arc::new(FailingStore), mailer)
}

fn open_state(store: Arc<dyn SubmissionStore>, mailer: Arc<RecordingMailer>) -> AppState {
    AppState::from_parts(
        test_config(),
        store,
        mailer,
        Arc::new(SharedSecret::new(TEST_CRON_SECRET)),
        None,
    )
}

/// Same as [`test_state`] but with the admin password gate enabled.
pub fn guarded_state(store: Arc<MemoryStore>) -> AppState {
    let admin: Arc<dyn CredentialVerifier> =
        Arc::new(PasswordHashCredential::from_plain(TEST_ADMIN_PASSWORD).unwrap());
    AppState::from_parts(
        test_config(),
        store,
        Arc::new(RecordingMailer::default()),
        Arc::new(SharedSecret::new(TEST_CRON_SECRET)),
        Some(admin),
    )
}

pub async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn read_json(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).unwrap()
}
