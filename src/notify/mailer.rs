use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::config::MailConfig;

/// Every alert goes to this inbox.
pub const ALERT_RECIPIENT: &str = "ak7055864@gmail.com";
pub const ALERT_SENDER_NAME: &str = "SensoSafe";
/// "Urgent report: gas leak"
pub const ALERT_SUBJECT: &str = "بلاغ عاجل: تسرب غاز";

/// Where the leak is and who to call back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub address: String,
    pub phone: String,
}

impl Alert {
    pub fn html(&self) -> String {
        format!(
            r#"
        <h2 style="color:red;">🚨 {ALERT_SUBJECT}</h2>
        <p><b>العنوان:</b> {}</p>
        <p><b>رقم الهاتف للتواصل:</b> {}</p>
      "#,
            self.address, self.phone
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_alert(&self, alert: &Alert) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("smtp relay {}", config.smtp_host))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            sender: config.username.clone(),
        })
    }

    fn build_message(&self, alert: &Alert) -> anyhow::Result<Message> {
        let sender: Address = self
            .sender
            .parse()
            .with_context(|| format!("sender address {:?}", self.sender))?;
        let recipient: Address = ALERT_RECIPIENT.parse().context("recipient address")?;
        let message = Message::builder()
            .from(Mailbox::new(Some(ALERT_SENDER_NAME.to_string()), sender))
            .to(Mailbox::new(None, recipient))
            .subject(ALERT_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(alert.html())
            .context("build alert email")?;
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_alert(&self, alert: &Alert) -> anyhow::Result<()> {
        let message = self.build_message(alert)?;
        let response = self.transport.send(message).await.context("smtp send")?;
        debug!(code = %response.code(), "alert email accepted");
        Ok(())
    }
}
