use std::path::Path;
use std::sync::Arc;

use chrono::{Local, Utc};
use kd_core::config::Branding;
use kd_core::{Result, DATE_FORMAT};
use tracing::info;

use crate::compose::{attachment_filename, html_body, subject, Draft};
use crate::transport::Mailer;

/// What was sent, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub subject: String,
    pub attachment_name: String,
    pub recipients: Vec<String>,
}

pub struct Dispatcher {
    branding: Branding,
    from: String,
    recipients: Vec<String>,
    mailer: Arc<dyn Mailer>,
}

impl Dispatcher {
    pub fn new(branding: &Branding, from: &str, recipients: &[String], mailer: Arc<dyn Mailer>) -> Self {
        Self {
            branding: branding.clone(),
            from: from.to_string(),
            recipients: recipients.to_vec(),
            mailer,
        }
    }

    /// Email the PDF at `pdf_path`. Without a period, today's date stands in.
    pub async fn dispatch(&self, pdf_path: &Path, period: Option<&str>) -> Result<Dispatched> {
        let now = Local::now();
        let period = period
            .map(str::to_string)
            .unwrap_or_else(|| now.format(DATE_FORMAT).to_string());

        let draft = Draft {
            from: self.from.clone(),
            recipients: self.recipients.clone(),
            subject: subject(&self.branding.tag, &period),
            html: html_body(&self.branding, &period, Utc::now()),
            attachment_name: attachment_filename(&self.branding.tag, now.date_naive()),
            attachment: tokio::fs::read(pdf_path).await?,
        };
        let message = draft.build()?;
        self.mailer.send(message).await?;

        info!("Email sent to: {:?}", self.recipients);
        Ok(Dispatched {
            subject: draft.subject,
            attachment_name: draft.attachment_name,
            recipients: draft.recipients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kd_core::Error;
    use lettre::Message;
    use std::sync::Mutex;

    /// Keeps every message instead of sending it.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: Message) -> Result<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: Message) -> Result<()> {
            Err(Error::Mail("connection refused".to_string()))
        }
    }

    fn pdf() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"%PDF-1.3\n%%EOF").unwrap();
        file
    }

    fn recipients() -> Vec<String> {
        vec!["one@kea.kz".to_string(), "two@kea.kz".to_string()]
    }

    #[tokio::test]
    async fn test_dispatch_sends_one_message() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = Dispatcher::new(&Branding::default(), "bot@kea.kz", &recipients(), mailer.clone());
        let file = pdf();

        let sent = dispatcher
            .dispatch(file.path(), Some("05.10.2026 — 11.10.2026"))
            .await
            .unwrap();

        assert_eq!(sent.subject, "КЭА | Дайджест энергетики | 05.10.2026 — 11.10.2026");
        let today = Local::now().format("%d-%m-%Y").to_string();
        assert_eq!(sent.attachment_name, format!("КЭА_Дайджест_{}.pdf", today));

        let messages = mailer.sent.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].envelope().to().len(), 2);
    }

    #[tokio::test]
    async fn test_period_falls_back_to_today() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = Dispatcher::new(&Branding::default(), "bot@kea.kz", &recipients(), mailer);
        let file = pdf();

        let sent = dispatcher.dispatch(file.path(), None).await.unwrap();
        let today = Local::now().format(DATE_FORMAT).to_string();
        assert!(sent.subject.ends_with(&today));
    }

    #[tokio::test]
    async fn test_mail_failure_is_fatal() {
        let dispatcher = Dispatcher::new(&Branding::default(), "bot@kea.kz", &recipients(), Arc::new(FailingMailer));
        let file = pdf();
        let err = dispatcher.dispatch(file.path(), None).await.unwrap_err();
        assert!(matches!(err, Error::Mail(_)));
    }

    #[tokio::test]
    async fn test_missing_pdf_is_io_error() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = Dispatcher::new(&Branding::default(), "bot@kea.kz", &recipients(), mailer.clone());
        let err = dispatcher
            .dispatch(Path::new("/nonexistent/digest.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }
}
