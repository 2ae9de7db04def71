//! SMTP delivery of the rendered report (feature `mail`).

use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};

use crate::domain::error::OppscanError;
use crate::ports::config_port::ConfigPort;

const PLAIN_FALLBACK: &str = "Please view this email in HTML format.";

fn mail_error(reason: String) -> OppscanError {
    OppscanError::Mail { reason }
}

fn required(config: &dyn ConfigPort, key: &str) -> Result<String, OppscanError> {
    config
        .get_string("mail", key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| OppscanError::ConfigMissing {
            section: "mail".into(),
            key: key.into(),
        })
}

fn parse_mailbox(key: &str, addr: &str) -> Result<Mailbox, OppscanError> {
    addr.trim().parse().map_err(|e| OppscanError::ConfigInvalid {
        section: "mail".into(),
        key: key.into(),
        reason: format!("invalid address '{}': {}", addr.trim(), e),
    })
}

pub struct MailAdapter {
    transport: SmtpTransport,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl MailAdapter {
    /// Reads `[mail]`; the password falls back to `SMTP_PASS`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, OppscanError> {
        let host = required(config, "host")?;
        let user = required(config, "user")?;
        let password = config
            .get_string("mail", "password")
            .filter(|p| !p.is_empty())
            .or_else(|| std::env::var("SMTP_PASS").ok())
            .ok_or_else(|| OppscanError::ConfigMissing {
                section: "mail".into(),
                key: "password".into(),
            })?;

        let port = config.get_int("mail", "port", 587);
        let port = u16::try_from(port).map_err(|_| OppscanError::ConfigInvalid {
            section: "mail".into(),
            key: "port".into(),
            reason: format!("{} is not a valid port", port),
        })?;

        let from_addr = config
            .get_string("mail", "from")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| user.clone());
        let from = parse_mailbox("from", &from_addr)?;

        let to = required(config, "to")?
            .split(',')
            .filter(|a| !a.trim().is_empty())
            .map(|a| parse_mailbox("to", a))
            .collect::<Result<Vec<_>, _>>()?;

        let transport = SmtpTransport::starttls_relay(&host)
            .map_err(|e| mail_error(format!("SMTP transport error: {}", e)))?
            .port(port)
            .credentials(Credentials::new(user, password))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    pub fn send(&self, subject: &str, html_body: String) -> Result<(), OppscanError> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        let email = builder
            .multipart(MultiPart::alternative_plain_html(
                PLAIN_FALLBACK.to_string(),
                html_body,
            ))
            .map_err(|e| mail_error(format!("failed to build email: {}", e)))?;

        self.transport
            .send(&email)
            .map_err(|e| mail_error(format!("failed to send email: {}", e)))?;

        tracing::info!(recipients = self.to.len(), %subject, "report mailed");
        Ok(())
    }
}
