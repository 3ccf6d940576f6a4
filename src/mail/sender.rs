//! SMTP report sender

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;

/// Split a raw recipient string on both `,` and `;`, trim whitespace, and
/// drop empty tokens.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sender bound to one validated transport and recipient list.
///
/// The transport upgrades to TLS after the initial handshake (STARTTLS),
/// authenticates with username/password, and closes the session on every
/// exit path; a fixed 30 s timeout bounds each network wait.
#[derive(Debug)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl Mailer {
    /// Validate addressing and build the transport. No network activity
    /// happens here; connection errors surface on [`Mailer::send`].
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .report_from
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.report_from.clone()))?;

        let raw_recipients = parse_recipients(&config.report_to);
        if raw_recipients.is_empty() {
            return Err(MailError::NoRecipients);
        }
        let recipients = raw_recipients
            .iter()
            .map(|addr| {
                addr.parse::<Mailbox>()
                    .map_err(|_| MailError::InvalidAddress(addr.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self {
            transport,
            from,
            recipients,
        })
    }

    /// Send one plain-text message to every configured recipient.
    pub async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        let message = builder
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        match self.transport.send(message).await {
            Ok(_) => {
                tracing::info!(
                    recipients = self.recipients.len(),
                    subject = %subject,
                    "report mail sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    permanent = e.is_permanent(),
                    error = %e,
                    "SMTP send failed"
                );
                Err(MailError::Send(e.to_string()))
            }
        }
    }
}

/// Mail errors. Addressing problems are configuration errors and fire
/// before any send attempt; send errors propagate so the run exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("REPORT_TO yielded no recipients (check the address list format)")]
    NoRecipients,

    #[error("invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("SMTP transport setup failed: {0}")]
    Transport(String),

    #[error("could not build message: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Send(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipients_mixed_delimiters() {
        let parsed = parse_recipients("a@x.com; b@y.com ,, c@z.com");
        assert_eq!(parsed, vec!["a@x.com", "b@y.com", "c@z.com"]);
    }

    #[test]
    fn test_parse_recipients_empty_input() {
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients(" ;, ; ").is_empty());
    }

    fn mail_config(to: &str) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "user".to_string(),
            smtp_pass: "pass".to_string(),
            report_from: "reports@example.com".to_string(),
            report_to: to.to_string(),
        }
    }

    #[test]
    fn test_mailer_rejects_empty_recipient_list() {
        let err = Mailer::new(&mail_config(" ; ,")).unwrap_err();
        assert!(matches!(err, MailError::NoRecipients));
    }

    #[test]
    fn test_mailer_rejects_malformed_address() {
        let err = Mailer::new(&mail_config("not-an-address")).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(_)));
    }

    #[test]
    fn test_mailer_accepts_valid_config_without_network() {
        let mailer = Mailer::new(&mail_config("a@x.com,b@y.com")).unwrap();
        assert_eq!(mailer.recipients.len(), 2);
    }
}
