// Mail dispatch: owns the transport handle, sends guest confirmation and
// hotel notification, and reports delivery outcome.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info, warn};

use crate::booking::{Booking, BookingConfirmation};
use crate::config::AppConfig;
use crate::templates;

// Errors reported by the underlying transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("SMTP connection failed: {0}")]
    Connect(String),

    #[error("send rejected by transport: {0}")]
    Send(String),
}

// Dispatch outcomes surfaced to the orchestrator
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Email could not be sent: {0}")]
    Delivery(String),

    #[error("SMTP transport unavailable: {0}")]
    Unavailable(String),

    #[error("mail dispatch timed out after {0}ms")]
    Timeout(u64),
}

/// A composed message handed to the transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Outbound mail channel. The SMTP session itself is the embedding
/// application's concern; the dispatcher only orchestrates on top of it.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn verify(&self) -> Result<(), TransportError>;
    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransportState {
    Uninitialized,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub hotel_name: String,
    pub sender_email: String,
    pub hotel_email: String,
    pub send_timeout_ms: u64,
}

impl From<&AppConfig> for MailerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            hotel_name: config.hotel_name.clone(),
            sender_email: config.sender_email.clone(),
            hotel_email: config.hotel_email.clone(),
            send_timeout_ms: config.send_timeout_ms,
        }
    }
}

/// Sends booking mail through a lazily verified transport.
///
/// Transport lifecycle is Uninitialized -> Ready on a successful handshake or
/// -> Failed on error; Failed retries verification on the next call. The state
/// sits behind an async mutex held across the handshake, so concurrent first
/// callers cannot race the initialization.
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    config: MailerConfig,
    state: AsyncMutex<TransportState>,
    last_millis: Mutex<i64>,
}

const ID_SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

impl Mailer {
    pub fn new(config: MailerConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            transport,
            config,
            state: AsyncMutex::new(TransportState::Uninitialized),
            last_millis: Mutex::new(0),
        }
    }

    /// Send the guest confirmation and, only after it succeeds, the internal
    /// hotel notification. The notification is best-effort: its failure is
    /// logged and swallowed, because the guest-facing confirmation is the
    /// primary success criterion.
    pub async fn send_confirmation(
        &self,
        booking: &Booking,
    ) -> Result<BookingConfirmation, MailError> {
        self.ensure_ready().await?;

        let booking_id = self.generate_booking_id();
        let checkout = templates::checkout_date(booking.arrival_date, booking.nights);

        let confirmation = OutgoingEmail {
            from: format!("\"{}\" <{}>", self.config.hotel_name, self.config.sender_email),
            to: booking.email.clone(),
            subject: templates::guest_subject(&booking_id),
            text: Some(templates::guest_text(booking, &booking_id, checkout)),
            html: Some(templates::guest_html(booking, &booking_id, checkout)),
        };

        let receipt = match self.send_bounded(&confirmation).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(err)) => {
                error!(booking_id = %booking_id, error = %err, "confirmation email failed");
                return Err(MailError::Delivery(err.to_string()));
            }
            Err(_) => {
                error!(booking_id = %booking_id, "confirmation email timed out");
                return Err(MailError::Timeout(self.config.send_timeout_ms));
            }
        };

        info!(
            booking_id = %booking_id,
            message_id = %receipt.message_id,
            to = %booking.email,
            "confirmation email sent"
        );

        self.send_hotel_notification(booking, &booking_id).await;

        Ok(BookingConfirmation {
            booking_id,
            message_id: receipt.message_id,
            checkout_date: checkout,
        })
    }

    async fn send_hotel_notification(&self, booking: &Booking, booking_id: &str) {
        let notification = OutgoingEmail {
            from: format!(
                "\"{} Booking System\" <{}>",
                self.config.hotel_name, self.config.sender_email
            ),
            to: self.config.hotel_email.clone(),
            subject: templates::hotel_notification_subject(booking_id),
            text: None,
            html: Some(templates::hotel_notification_html(
                booking,
                booking_id,
                Utc::now(),
            )),
        };

        match self.send_bounded(&notification).await {
            Ok(Ok(_)) => info!(booking_id = %booking_id, "hotel notification sent"),
            Ok(Err(err)) => {
                warn!(booking_id = %booking_id, error = %err, "hotel notification failed")
            }
            Err(_) => warn!(booking_id = %booking_id, "hotel notification timed out"),
        }
    }

    /// Re-run transport verification; used by the diagnostic endpoint.
    pub async fn test_connection(&self) -> bool {
        let mut state = self.state.lock().await;
        match self.verify_bounded().await {
            Ok(Ok(())) => {
                *state = TransportState::Ready;
                info!("SMTP connection successful");
                true
            }
            Ok(Err(err)) => {
                *state = TransportState::Failed;
                error!(error = %err, "SMTP connection failed");
                false
            }
            Err(_) => {
                *state = TransportState::Failed;
                error!("SMTP verification timed out");
                false
            }
        }
    }

    /// `HE` + last six digits of a strictly increasing millisecond reading +
    /// three random uppercase alphanumerics. Unique enough for intake volume;
    /// collisions are possible and accepted at this scope.
    pub fn generate_booking_id(&self) -> String {
        let millis = self.next_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..3)
            .map(|_| ID_SUFFIX_CHARSET[rng.gen_range(0..ID_SUFFIX_CHARSET.len())] as char)
            .collect();
        format!("HE{:06}{}", millis % 1_000_000, suffix)
    }

    async fn ensure_ready(&self) -> Result<(), MailError> {
        let mut state = self.state.lock().await;
        if *state == TransportState::Ready {
            return Ok(());
        }

        // Uninitialized or Failed: (re)verify lazily, guard held throughout
        match self.verify_bounded().await {
            Ok(Ok(())) => {
                *state = TransportState::Ready;
                info!("SMTP connection verified");
                Ok(())
            }
            Ok(Err(err)) => {
                *state = TransportState::Failed;
                error!(error = %err, "SMTP connection failed");
                Err(MailError::Unavailable(err.to_string()))
            }
            Err(_) => {
                *state = TransportState::Failed;
                error!("SMTP verification timed out");
                Err(MailError::Timeout(self.config.send_timeout_ms))
            }
        }
    }

    async fn verify_bounded(
        &self,
    ) -> Result<Result<(), TransportError>, tokio::time::error::Elapsed> {
        tokio::time::timeout(self.send_timeout(), self.transport.verify()).await
    }

    async fn send_bounded(
        &self,
        email: &OutgoingEmail,
    ) -> Result<Result<SendReceipt, TransportError>, tokio::time::error::Elapsed> {
        tokio::time::timeout(self.send_timeout(), self.transport.send(email)).await
    }

    fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.config.send_timeout_ms)
    }

    // Never hands out the same reading twice, even if the wall clock stalls
    fn next_millis(&self) -> i64 {
        let mut last = self.last_millis.lock();
        let now = Utc::now().timestamp_millis();
        *last = if now > *last { now } else { *last + 1 };
        *last
    }
}


#[cfg(test)]
mod tests {
    use super::mock_transport::MockTransport;
    use super::*;
    use crate::booking::RoomType;
    use chrono::NaiveDate;
    use regex::Regex;

    fn mailer_with(transport: Arc<MockTransport>) -> Mailer {
        let config = MailerConfig {
            hotel_name: "Hotel Boss".to_string(),
            sender_email: "info@hoteleurope.com".to_string(),
            hotel_email: "frontdesk@hoteleurope.com".to_string(),
            send_timeout_ms: 200,
        };
        Mailer::new(config, transport)
    }

    fn sample_booking() -> Booking {
        Booking {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            arrival_date: NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
            nights: 2,
            room_type: RoomType::Deluxe,
            guests: 2,
            special_requests: None,
            newsletter: false,
        }
    }

    #[test]
    fn test_booking_id_format() {
        let transport = MockTransport::new();
        let mailer = mailer_with(transport);
        let pattern = Regex::new(r"^HE\d{6}[A-Z0-9]{3}$").unwrap();

        for _ in 0..100 {
            let id = mailer.generate_booking_id();
            assert!(pattern.is_match(&id), "bad booking id: {}", id);
        }
    }

    #[test]
    fn test_booking_id_millis_strictly_increase() {
        let transport = MockTransport::new();
        let mailer = mailer_with(transport);

        let mut previous = 0;
        for _ in 0..50 {
            let current = mailer.next_millis();
            assert!(current > previous);
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_confirmation_sends_guest_then_hotel_mail() {
        let transport = MockTransport::new();
        let mailer = mailer_with(Arc::clone(&transport));

        let confirmation = mailer.send_confirmation(&sample_booking()).await.unwrap();
        assert_eq!(
            confirmation.checkout_date,
            NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()
        );
        assert!(confirmation.message_id.starts_with("<msg-"));

        let sent = transport.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "jane@example.com");
        assert!(sent[0].text.is_some() && sent[0].html.is_some());
        assert!(sent[0].subject.contains(&confirmation.booking_id));
        assert_eq!(sent[1].to, "frontdesk@hoteleurope.com");
        assert!(sent[1].subject.contains(&confirmation.booking_id));
    }

    #[tokio::test]
    async fn test_guest_send_failure_surfaces_and_skips_notification() {
        let transport = MockTransport::new();
        transport.fail_next_sends(1);
        let mailer = mailer_with(Arc::clone(&transport));

        let err = mailer.send_confirmation(&sample_booking()).await.unwrap_err();
        assert!(matches!(err, MailError::Delivery(_)));
        assert!(err.to_string().starts_with("Email could not be sent"));
        assert_eq!(transport.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_hotel_notification_failure_is_swallowed() {
        let transport = MockTransport::new();
        transport.fail_sends_to("frontdesk@hoteleurope.com").await;
        let mailer = mailer_with(Arc::clone(&transport));

        let result = mailer.send_confirmation(&sample_booking()).await;
        assert!(result.is_ok(), "guest confirmation alone decides success");
        assert_eq!(transport.sent_count().await, 1);
    }

    #[tokio::test]
    async fn test_verify_failure_reports_unavailable_then_retries_lazily() {
        let transport = MockTransport::new();
        transport.fail_next_verifies(1);
        let mailer = mailer_with(Arc::clone(&transport));

        let err = mailer.send_confirmation(&sample_booking()).await.unwrap_err();
        assert!(matches!(err, MailError::Unavailable(_)));
        assert_eq!(transport.sent_count().await, 0);

        // Failed state retries initialization on the next call
        let result = mailer.send_confirmation(&sample_booking()).await;
        assert!(result.is_ok());
        assert_eq!(transport.sent_count().await, 2);
    }

    #[tokio::test]
    async fn test_slow_send_is_bounded_and_reported_as_timeout() {
        let transport = MockTransport::new();
        transport.set_send_delay(1_000);
        let mailer = mailer_with(Arc::clone(&transport));

        let err = mailer.send_confirmation(&sample_booking()).await.unwrap_err();
        assert!(matches!(err, MailError::Timeout(200)));
    }

    #[tokio::test]
    async fn test_test_connection_reflects_transport_health() {
        let transport = MockTransport::new();
        let mailer = mailer_with(Arc::clone(&transport));
        assert!(mailer.test_connection().await);

        transport.fail_next_verifies(1);
        assert!(!mailer.test_connection().await);
        // Recovers once the transport does
        assert!(mailer.test_connection().await);
    }
}
