use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use crate::models::reservation_model::Reservation;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tells the cinema about a new hall reservation.
    async fn reservation_created(&self, reservation: &Reservation) -> AppResult<()>;
}

/// SMTP notifier. The transport is built once at startup and shared by all requests.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailbox: Option<Mailbox>,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpNotifier {
    pub fn new(config: Option<EmailConfig>) -> AppResult<Self> {
        let Some(config) = config else {
            tracing::warn!("Email not configured, reservation notices will be skipped");
            return Ok(Self {
                mailbox: None,
                transport: None,
            });
        };

        let mailbox: Mailbox = format!("Cinema Hall Booking <{}>", config.user)
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid email address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::Internal(format!("SMTP setup failed: {}", e)))?
            .credentials(Credentials::new(config.user, config.password))
            .build();

        Ok(Self {
            mailbox: Some(mailbox),
            transport: Some(transport),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn reservation_created(&self, reservation: &Reservation) -> AppResult<()> {
        let (Some(mailbox), Some(transport)) = (&self.mailbox, &self.transport) else {
            tracing::warn!(email = %reservation.email, "Email transport not configured, skipping reservation notice");
            return Ok(());
        };

        let email = Message::builder()
            .from(mailbox.clone())
            .to(mailbox.clone())
            .subject("New Hall Reservation")
            .header(ContentType::TEXT_HTML)
            .body(reservation_email_body(reservation))
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send email: {}", e)))?;

        tracing::info!(sender = %reservation.sender_name, "Sent reservation notice");
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn reservation_email_body(reservation: &Reservation) -> String {
    let message = reservation
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("No message");

    format!(
        r#"<h2>New Hall Reservation</h2>
<p><strong>Name:</strong> {}</p>
<p><strong>Email:</strong> {}</p>
<p><strong>Phone:</strong> {}</p>
<p><strong>Preferred Contact Method:</strong> {}</p>
<p><strong>Event:</strong> {}</p>
<p><strong>People Attending:</strong> {}</p>
<p><strong>Start Time:</strong> {}</p>
<p><strong>End Time:</strong> {}</p>
<p><strong>Date:</strong> {}</p>
<p><strong>Message:</strong> {}</p>
"#,
        escape(&reservation.sender_name),
        escape(&reservation.email),
        escape(&reservation.phone),
        escape(&reservation.talk),
        escape(&reservation.events),
        reservation.people_attend,
        escape(&reservation.event_start_time),
        escape(&reservation.event_end_time),
        escape(&reservation.reserved_date),
        escape(message),
    )
}
