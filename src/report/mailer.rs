use anyhow::{Context, Result, anyhow, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use futures::{FutureExt, future::BoxFuture};
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::MailSettings;

/// File attached to an outgoing email.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EmailAttachment {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Outbound mail transport.
pub trait Mailer: Send + Sync {
    fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, Result<()>>;
}

/// Build the mailer described by `settings`.
pub fn from_settings(settings: &MailSettings) -> Result<Box<dyn Mailer>> {
    match &settings.api_url {
        Some(url) => Ok(Box::new(HttpMailer::new(url.clone(), settings)?)),
        None => Ok(Box::new(UnconfiguredMailer)),
    }
}

/// Posts messages as JSON to an HTTP mail relay.
#[derive(Clone)]
pub struct HttpMailer {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    attachments: Vec<RelayAttachment<'a>>,
}

#[derive(Serialize)]
struct RelayAttachment<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: String, settings: &MailSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("failed to build mail HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            api_key: settings.api_key.clone(),
        })
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        let payload = RelayPayload {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            attachments: email
                .attachments
                .iter()
                .map(|attachment| RelayAttachment {
                    filename: &attachment.filename,
                    content: BASE64.encode(&attachment.bytes),
                    content_type: &attachment.content_type,
                })
                .collect(),
        };

        let mut request = self.http.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("failed to reach mail relay")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(300).collect();
            bail!("mail relay responded with {status}: {preview}");
        }

        info!(subject = %email.subject, recipients = email.to.len(), "email handed to relay");
        Ok(())
    }
}

impl Mailer for HttpMailer {
    fn send(&self, email: OutgoingEmail) -> BoxFuture<'_, Result<()>> {
        self.deliver(email).boxed()
    }
}

/// Stand-in used when no relay is configured; every send fails.
pub struct UnconfiguredMailer;

impl Mailer for UnconfiguredMailer {
    fn send(&self, _email: OutgoingEmail) -> BoxFuture<'_, Result<()>> {
        async { Err(anyhow!("MAIL_API_URL is not configured; cannot send email")) }.boxed()
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        http::{HeaderMap, StatusCode, header::AUTHORIZATION},
        routing::post,
    };
    use tokio::net::TcpListener;

    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "a@example.com".into(),
            to: vec!["b@example.com".into()],
            subject: "s".into(),
            html: String::new(),
            text: String::new(),
            attachments: Vec::new(),
        }
    }

    /// Local relay that always fails, echoing the authorization header it saw.
    async fn failing_relay() -> String {
        async fn reject(headers: HeaderMap) -> (StatusCode, String) {
            let auth = headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("none")
                .to_string();
            (StatusCode::INTERNAL_SERVER_ERROR, format!("relay down; auth={auth}"))
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/send", post(reject));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/send")
    }

    #[tokio::test]
    async fn unconfigured_mailer_fails_with_hint() {
        let settings = MailSettings {
            api_url: None,
            api_key: None,
            timeout: Duration::from_secs(1),
        };
        let mailer = from_settings(&settings).unwrap();
        let err = mailer.send(email()).await.unwrap_err();
        assert!(err.to_string().contains("MAIL_API_URL"));
    }

    #[tokio::test]
    async fn relay_error_status_surfaces_with_body_preview() {
        let settings = MailSettings {
            api_url: Some(failing_relay().await),
            api_key: Some("relay-key".into()),
            timeout: Duration::from_secs(5),
        };
        let mailer = from_settings(&settings).unwrap();

        let err = mailer.send(email()).await.unwrap_err().to_string();
        assert!(err.contains("500"), "{err}");
        assert!(err.contains("relay down"), "{err}");
        assert!(err.contains("auth=Bearer relay-key"), "{err}");
    }

    #[test]
    fn relay_payload_encodes_attachments() {
        let to = vec!["b@example.com".to_string()];
        let payload = RelayPayload {
            from: "a@example.com",
            to: &to,
            subject: "Weekly",
            html: "<p>hi</p>",
            text: "hi",
            attachments: vec![RelayAttachment {
                filename: "report.csv",
                content: BASE64.encode(b"a,b\n"),
                content_type: "text/csv",
            }],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["attachments"][0]["content"], "YSxiCg==");
        assert_eq!(value["to"][0], "b@example.com");
    }
}
