//! SMTP email sink.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::EmailConfig;
use crate::error::{SinkError, SinkResult};
use crate::sink::{AlertNotice, NotificationSink};

pub struct EmailSink {
    config: EmailConfig,
}

impl EmailSink {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// "[PRICE ALERT] XRP/USDT".
    pub fn subject(&self, notice: &AlertNotice) -> String {
        format!("{} {}", self.config.subject_prefix, notice.pair_label())
    }

    pub fn html_body(notice: &AlertNotice) -> String {
        format!(
            "<html>\n<body>\n\
             <h2>Price Discrepancy Alert</h2>\n\
             <p><strong>Symbol:</strong> {}</p>\n\
             <p><strong>Alert:</strong> {}</p>\n\
             <p><strong>Time:</strong> {}</p>\n\
             <p>This is an automated alert from your cross-exchange price tracker.</p>\n\
             </body>\n</html>\n",
            notice.pair_label(),
            notice.message,
            notice.display_time()
        )
    }

    fn build_message(&self, notice: &AlertNotice) -> SinkResult<Message> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e| SinkError::Build(format!("invalid from address '{}': {e}", self.config.from)))?;
        let to: Mailbox = self
            .config
            .to
            .parse()
            .map_err(|e| SinkError::Build(format!("invalid to address '{}': {e}", self.config.to)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject(notice))
            .header(ContentType::TEXT_HTML)
            .body(Self::html_body(notice))
            .map_err(|e| SinkError::Build(e.to_string()))
    }

    fn build_transport(&self) -> SinkResult<AsyncSmtpTransport<Tokio1Executor>> {
        let mut builder = if self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
                .map_err(|e| SinkError::Build(format!("SMTP relay: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_server)
        };
        builder = builder.port(self.config.smtp_port);

        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl NotificationSink for EmailSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notice: &AlertNotice) -> SinkResult<()> {
        if self.config.to.trim().is_empty() {
            return Err(SinkError::NotConfigured {
                sink: "email",
                reason: "recipient (alerts.email.to) is empty".to_string(),
            });
        }

        let message = self.build_message(notice)?;
        let transport = self.build_transport()?;
        transport
            .send(message)
            .await
            .map_err(|e| SinkError::Delivery(format!("SMTP: {e}")))?;

        info!(to = %self.config.to, "Email alert sent via SMTP");
        Ok(())
    }
}
