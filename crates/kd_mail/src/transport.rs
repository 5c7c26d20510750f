use std::fmt;

use async_trait::async_trait;
use kd_core::config::SmtpConfig;
use kd_core::{Error, Result};
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

/// Submits a finished message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: Message) -> Result<()>;
}

/// Authenticated SMTP over implicit TLS.
pub struct SmtpMailer {
    host: String,
    port: u16,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, user: &str, password: &str) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| Error::Mail(format!("invalid SMTP relay {}: {}", config.host, e)))?
            .port(config.port)
            .credentials(SmtpCredentials::new(user.to_string(), password.to_string()))
            .build();
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            transport,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<()> {
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| Error::Mail(format!("SMTP submission to {} failed: {}", self.host, e)))?;
        debug!("SMTP response: {:?}", response.code());
        Ok(())
    }
}
