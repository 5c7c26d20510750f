use chrono::{DateTime, Duration, NaiveDate, Utc};
use kd_core::config::Branding;
use kd_core::{Error, Result};
use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::Message;

/// Astana is UTC+5 all year.
const ASTANA_OFFSET_HOURS: i64 = 5;

pub fn subject(tag: &str, period: &str) -> String {
    format!("{} | Дайджест энергетики | {}", tag, period)
}

pub fn attachment_filename(tag: &str, today: NaiveDate) -> String {
    format!("{}_Дайджест_{}.pdf", tag, today.format("%d-%m-%Y"))
}

/// `dd.mm.yyyy HH:MM (Астана)` for the given instant.
pub fn astana_timestamp(now: DateTime<Utc>) -> String {
    let local = now + Duration::hours(ASTANA_OFFSET_HOURS);
    format!("{} (Астана)", local.format("%d.%m.%Y %H:%M"))
}

pub fn html_body(branding: &Branding, period: &str, now: DateTime<Utc>) -> String {
    format!(
        r#"<html><body style="font-family:Arial,sans-serif;color:#1A1A2E;max-width:600px">
  <table width="100%" style="background:#114272;padding:16px 24px">
    <tr>
      <td>
        <span style="color:#C0985C;font-weight:bold;font-size:14px">{association}</span><br>
        <span style="color:#F2F2F2;font-size:12px">Еженедельный дайджест энергетики РК</span>
      </td>
    </tr>
  </table>
  <div style="padding:20px 0;color:#555;font-size:13px">
    <p>Добрый день,</p>
    <p>Во вложении еженедельный дайджест новостей энергетики Казахстана
       за период <strong>{period}</strong>.</p>
    <p>Документ содержит ключевые события по регуляторике, тарифам, ВИЭ,
       инфраструктуре и международной повестке, а также блок
       <strong>«Требует реакции {tag}»</strong>.</p>
  </div>
  <div style="border-top:1px solid #D9D9D9;padding-top:12px;color:#999;font-size:11px">
    Автоматическая рассылка {tag} &nbsp;|&nbsp; {site}<br>
    Сформировано: {stamp}
  </div>
</body></html>"#,
        association = branding.association,
        period = period,
        tag = branding.tag,
        site = branding.site,
        stamp = astana_timestamp(now),
    )
}

pub fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| Error::Mail(format!("invalid address {:?}: {}", address, e)))
}

/// What goes into one digest email.
#[derive(Debug, Clone)]
pub struct Draft {
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

impl Draft {
    /// Build a `multipart/mixed` message: HTML body plus the PDF as an
    /// octet-stream attachment. All recipients share one message.
    pub fn build(&self) -> Result<Message> {
        if self.recipients.is_empty() {
            return Err(Error::Mail("no recipients".to_string()));
        }

        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .subject(self.subject.as_str());
        for recipient in &self.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let octet_stream = ContentType::parse("application/octet-stream")
            .map_err(|e| Error::Mail(e.to_string()))?;
        let pdf = Body::new_with_encoding(self.attachment.clone(), ContentTransferEncoding::Base64)
            .map_err(|_| Error::Mail("attachment cannot be base64 encoded".to_string()))?;
        let body = MultiPart::mixed()
            .singlepart(SinglePart::html(self.html.clone()))
            .singlepart(Attachment::new(self.attachment_name.clone()).body(pdf, octet_stream));

        builder
            .multipart(body)
            .map_err(|e| Error::Mail(format!("failed to build message: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(recipients: &[&str]) -> Draft {
        Draft {
            from: "digest@kea.kz".to_string(),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            subject: subject("КЭА", "05.10.2026 — 11.10.2026"),
            html: "<p>hi</p>".to_string(),
            attachment_name: "КЭА_Дайджест_12-10-2026.pdf".to_string(),
            attachment: b"%PDF-1.3 test".to_vec(),
        }
    }

    #[test]
    fn test_subject_and_filename() {
        assert_eq!(
            subject("КЭА", "05.10.2026 — 11.10.2026"),
            "КЭА | Дайджест энергетики | 05.10.2026 — 11.10.2026"
        );
        let day = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert_eq!(attachment_filename("КЭА", day), "КЭА_Дайджест_12-10-2026.pdf");
    }

    #[test]
    fn test_timestamp_in_astana_time() {
        let now = Utc.with_ymd_and_hms(2026, 10, 12, 20, 30, 0).unwrap();
        assert_eq!(astana_timestamp(now), "13.10.2026 01:30 (Астана)");

        let html = html_body(&Branding::default(), "05.10.2026 — 11.10.2026", now);
        assert!(html.contains("<strong>05.10.2026 — 11.10.2026</strong>"));
        assert!(html.contains("Сформировано: 13.10.2026 01:30 (Астана)"));
        assert!(html.contains("ОЮЛ «Казахстанская Электроэнергетическая Ассоциация»"));
    }

    #[test]
    fn test_one_message_for_all_recipients() {
        let message = draft(&["a@kea.kz", " b@kea.kz "]).build().unwrap();
        assert_eq!(message.envelope().to().len(), 2);

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("application/octet-stream"));
        assert!(raw.contains("text/html"));
        // The attachment is plain ASCII yet still goes out as base64.
        let attachment = raw
            .split("\r\n--")
            .find(|part| part.contains("application/octet-stream"))
            .unwrap();
        assert!(attachment.contains("Content-Transfer-Encoding: base64"));
    }

    #[test]
    fn test_invalid_address_is_mail_error() {
        let err = draft(&["not an address"]).build().unwrap_err();
        assert!(matches!(err, Error::Mail(_)));
        assert!(matches!(draft(&[]).build(), Err(Error::Mail(_))));
    }
}
