//! services/api/src/adapters/mailer.rs
//!
//! This module contains the SMTP adapter for outgoing email.
//! It implements the `Mailer` port from the `core` crate using `lettre`.

use async_trait::async_trait;
use contact_form_core::domain::OutgoingEmail;
use contact_form_core::ports::{Mailer, PortError, PortResult};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SmtpConfig;

/// Host and port of the provider used when no organization SMTP server is configured.
const FALLBACK_PROVIDER_HOST: &str = "smtp.gmail.com";
const FALLBACK_PROVIDER_PORT: u16 = 465;

//=========================================================================================
// Transport Profile Selection
//=========================================================================================

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS from the first byte (`SMTP_SECURE=true`, port 465 style).
    Implicit,
    /// Plain connection upgraded with `STARTTLS`.
    StartTls,
}

/// Which SMTP endpoint outgoing mail goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportProfile {
    /// The organization's own server. `secure` selects implicit TLS over STARTTLS.
    Custom {
        host: String,
        port: u16,
        secure: bool,
    },
    /// The consumer email provider, always over implicit TLS.
    Provider { host: &'static str, port: u16 },
}

impl TransportProfile {
    /// A configured SMTP host wins; otherwise mail falls back to the provider.
    pub fn from_config(config: &SmtpConfig) -> Self {
        match &config.host {
            Some(host) => Self::Custom {
                host: host.clone(),
                port: config.port,
                secure: config.secure,
            },
            None => Self::Provider {
                host: FALLBACK_PROVIDER_HOST,
                port: FALLBACK_PROVIDER_PORT,
            },
        }
    }

    pub fn host(&self) -> &str {
        match self {
            Self::Custom { host, .. } => host,
            Self::Provider { host, .. } => host,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Self::Custom { port, .. } | Self::Provider { port, .. } => *port,
        }
    }

    pub fn tls_mode(&self) -> TlsMode {
        match self {
            Self::Custom { secure: false, .. } => TlsMode::StartTls,
            Self::Custom { secure: true, .. } | Self::Provider { .. } => TlsMode::Implicit,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `Mailer` port over SMTP.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Option<Mailbox>,
    profile: TransportProfile,
}

impl SmtpMailer {
    /// Creates a new `SmtpMailer` for the profile selected by `config`.
    ///
    /// No connection is opened here; the pooled transport connects on first send.
    pub fn new(config: &SmtpConfig) -> PortResult<Self> {
        let profile = TransportProfile::from_config(config);

        let builder = match profile.tls_mode() {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(profile.host()),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(profile.host()),
        }
        .map_err(|e| PortError::Misconfigured(e.to_string()))?
        .port(profile.port());

        let builder = match (&config.user, &config.password) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.clone(), password.clone()))
            }
            _ => {
                warn!("EMAIL_USER or EMAIL_PASS is not set; sending without authentication");
                builder
            }
        };

        let from = match config.user.as_deref().map(str::parse::<Mailbox>) {
            Some(Ok(mailbox)) => Some(mailbox),
            Some(Err(e)) => {
                warn!("EMAIL_USER is not a valid sender address: {}", e);
                None
            }
            None => None,
        };

        Ok(Self {
            transport: builder.build(),
            from,
            profile,
        })
    }

    pub fn profile(&self) -> &TransportProfile {
        &self.profile
    }

    fn build_message(&self, email: OutgoingEmail) -> PortResult<(Message, String)> {
        let from = self.from.clone().ok_or_else(|| {
            PortError::Misconfigured("no valid sender address (EMAIL_USER)".to_string())
        })?;
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| PortError::Unexpected(format!("invalid recipient: {e}")))?;
        let reply_to = email
            .reply_to
            .map(|r| r.parse::<Mailbox>())
            .transpose()
            .map_err(|e| PortError::Unexpected(format!("invalid reply-to: {e}")))?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML);
        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to);
        }

        let message = builder
            .body(email.html_body)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok((message, message_id))
    }
}

//=========================================================================================
// `Mailer` Trait Implementation
//=========================================================================================

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> PortResult<String> {
        let (message, message_id) = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.is_positive() {
            return Err(PortError::Unexpected(format!(
                "SMTP server rejected the message with code {}",
                response.code()
            )));
        }

        info!(%message_id, "Email accepted by SMTP server");
        Ok(message_id)
    }
}
