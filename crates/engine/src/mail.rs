//! Notification collaborator.

use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{EngineError, ResultEngine};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> ResultEngine<()>;
}

#[derive(Clone, Debug)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// SMTP mailer over a relay with credentials.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> ResultEngine<Self> {
        let transport = SmtpTransport::relay(&settings.server)
            .map_err(|err| EngineError::Unavailable(format!("smtp relay: {err}")))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        let from = settings
            .from
            .parse()
            .map_err(|_| EngineError::Validation("invalid from address".to_string()))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> ResultEngine<()> {
        let to: Mailbox = to
            .parse()
            .map_err(|_| EngineError::Validation("invalid recipient address".to_string()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|err| EngineError::Unavailable(format!("mail build: {err}")))?;

        // lettre's SMTP transport is blocking; keep it off the async runtime.
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|err| EngineError::Unavailable(format!("mail task: {err}")))?
            .map_err(|err| EngineError::Unavailable(format!("mail send: {err}")))?;
        Ok(())
    }
}
