use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::model::Demande;

/// Outcome of one notification dispatch. Reported to the caller as an
/// informational string only; it never affects the mutation that
/// triggered the send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    Envoye,
    PasDAdresse,
    Echec,
}

impl EmailStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::Envoye => "Email envoyé avec succès !",
            Self::PasDAdresse => "Aucun email envoyé : pas d'adresse email fournie.",
            Self::Echec => "Erreur lors de l'envoi de l'email.",
        }
    }
}

/// Post-commit notification hook. Without SMTP credentials the
/// transport stays unset and every dispatch reports [`EmailStatus::Echec`]
/// without touching the network.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: String,
    from_address: Option<String>,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        let transport = match (&config.smtp_user, &config.smtp_pass) {
            (Some(user), Some(pass)) => {
                match AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay) {
                    Ok(builder) => Some(
                        builder
                            .credentials(Credentials::new(user.clone(), pass.clone()))
                            .build(),
                    ),
                    Err(e) => {
                        error!(error = %e, relay = %config.smtp_relay, "Failed to build SMTP transport");
                        None
                    }
                }
            }
            _ => {
                warn!("SMTP credentials not configured, notifications disabled");
                None
            }
        };

        Self {
            transport,
            sender: config.mail_sender.clone(),
            from_address: config.smtp_user.clone(),
        }
    }

    /// Mailer that never sends. Every dispatch reports a send failure.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            sender: "Service RH".to_string(),
            from_address: None,
        }
    }

    /// Sends the status notification for one demande. Best effort: all
    /// failures are logged and collapsed into the returned status.
    pub async fn notify<R: Demande>(&self, demande: &R) -> EmailStatus {
        let base = demande.base();
        if base.email.trim().is_empty() {
            return EmailStatus::PasDAdresse;
        }

        let (Some(transport), Some(from_address)) = (&self.transport, &self.from_address) else {
            warn!(id = %base.id, "Notification skipped, mailer disabled");
            return EmailStatus::Echec;
        };

        let from: Mailbox = match format!("{} <{}>", self.sender, from_address).parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!(error = %e, "Invalid sender address");
                return EmailStatus::Echec;
            }
        };
        let to: Mailbox = match base.email.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!(error = %e, email = %base.email, id = %base.id, "Invalid recipient address");
                return EmailStatus::Echec;
            }
        };

        let message = match Message::builder()
            .from(from)
            .to(to)
            .subject(R::email_subject())
            .body(demande.email_body())
        {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, id = %base.id, "Failed to build notification email");
                return EmailStatus::Echec;
            }
        };

        match transport.send(message).await {
            Ok(_) => {
                info!(email = %base.email, id = %base.id, "Notification email sent");
                EmailStatus::Envoye
            }
            Err(e) => {
                error!(error = %e, email = %base.email, id = %base.id, "Failed to send notification email");
                EmailStatus::Echec
            }
        }
    }
}
