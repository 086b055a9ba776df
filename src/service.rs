// Booking orchestrator: sequences rate limiting, validation and mail
// dispatch, and assembles the client-facing responses.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

use chrono::Utc;

use crate::booking::{BookingRecord, RawBooking};
use crate::config::AppConfig;
use crate::mailer::{MailError, MailTransport, Mailer, MailerConfig};
use crate::rate_limit::{Admission, SlidingWindowLimiter};
use crate::validator::Validator;

// Failure classification for a booking attempt
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Too many booking attempts. Please try again in 15 minutes.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Booking received but email confirmation failed. We will contact you shortly.")]
    EmailDelivery(String),

    #[error("Email service temporarily unavailable. Your booking request has been received.")]
    TransportUnavailable(String),

    #[error("Request timeout. Please try again.")]
    Timeout(String),

    #[error("An unexpected error occurred while processing your booking.")]
    Unexpected(String),
}

impl BookingError {
    pub fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::RateLimited { .. } => 429,
            BookingError::EmailDelivery(_) => 503,
            BookingError::TransportUnavailable(_) => 503,
            BookingError::Timeout(_) => 504,
            BookingError::Unexpected(_) => 500,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            BookingError::Validation(_) => "ValidationError",
            BookingError::RateLimited { .. } => "RateLimitExceeded",
            BookingError::EmailDelivery(_) => "EmailDeliveryFailed",
            BookingError::TransportUnavailable(_) => "TransportUnavailable",
            BookingError::Timeout(_) => "Timeout",
            BookingError::Unexpected(_) => "Unexpected",
        }
    }

    // Internal detail, exposed in development mode only
    fn details(&self) -> Option<&str> {
        match self {
            BookingError::EmailDelivery(details)
            | BookingError::TransportUnavailable(details)
            | BookingError::Timeout(details)
            | BookingError::Unexpected(details) => Some(details),
            _ => None,
        }
    }
}

impl From<MailError> for BookingError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Delivery(details) => BookingError::EmailDelivery(details),
            MailError::Unavailable(details) => BookingError::TransportUnavailable(details),
            MailError::Timeout(ms) => BookingError::Timeout(format!("dispatch exceeded {}ms", ms)),
        }
    }
}

/// Status code plus JSON body, ready for the embedding HTTP layer.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

/// Per-request client metadata stamped onto the transient booking record.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub ip: String,
    pub user_agent: Option<String>,
}

pub struct BookingService {
    config: AppConfig,
    validator: Validator,
    limiter: SlidingWindowLimiter,
    mailer: Mailer,
}

impl BookingService {
    pub fn new(config: AppConfig, transport: Arc<dyn MailTransport>) -> Self {
        let limiter = SlidingWindowLimiter::new(
            config.rate_limit_window_secs,
            config.max_booking_attempts,
        );
        let mailer = Mailer::new(MailerConfig::from(&config), transport);
        Self {
            config,
            validator: Validator::new(),
            limiter,
            mailer,
        }
    }

    /// Handle one booking submission: rate-limit, validate, stamp the
    /// transient record, dispatch mail, map the outcome.
    ///
    /// Nothing is persisted; the record is dropped once the reply is built.
    pub async fn create_booking(&self, raw: RawBooking, client: ClientMeta) -> ApiReply {
        let started = Instant::now();
        info!(ip = %client.ip, "processing new booking request");

        if let Admission::Rejected { retry_after_secs } = self.limiter.check(&client.ip) {
            let err = BookingError::RateLimited { retry_after_secs };
            return ApiReply {
                status: err.status_code(),
                body: json!({
                    "success": false,
                    "message": err.to_string(),
                    "retryAfter": retry_after_secs,
                }),
            };
        }

        let booking = match self.validator.validate(&raw) {
            Ok(booking) => booking,
            Err(errors) => {
                let err = BookingError::Validation(errors.clone());
                return ApiReply {
                    status: err.status_code(),
                    body: json!({
                        "success": false,
                        "message": err.to_string(),
                        "errors": errors,
                    }),
                };
            }
        };

        // TODO: persist the record once a database layer exists
        let record = BookingRecord {
            booking,
            booking_time: Utc::now(),
            source_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };

        match self.mailer.send_confirmation(&record.booking).await {
            Ok(confirmation) => {
                let processing_ms = started.elapsed().as_millis();
                info!(
                    booking_id = %confirmation.booking_id,
                    processing_ms,
                    "booking processed successfully"
                );
                ApiReply {
                    status: 201,
                    body: json!({
                        "success": true,
                        "message": "Booking created successfully! Confirmation email has been sent.",
                        "data": {
                            "bookingId": confirmation.booking_id,
                            "guest": {
                                "name": record.booking.name,
                                "email": record.booking.email,
                            },
                            "reservation": {
                                "arrivalDate": record.booking.arrival_date.to_string(),
                                "nights": record.booking.nights,
                                "roomType": record.booking.room_type.as_str(),
                                "guests": record.booking.guests,
                            },
                            "emailSent": true,
                            "messageId": confirmation.message_id,
                        },
                        "meta": self.meta(started),
                    }),
                }
            }
            Err(err) => self.failure_reply(BookingError::from(err), started),
        }
    }

    /// Diagnostic endpoint behavior: disabled in production, otherwise
    /// exercises the transport verification.
    pub async fn test_email(&self) -> ApiReply {
        if self.config.environment.is_production() {
            return ApiReply {
                status: 404,
                body: json!({ "message": "Endpoint not available in production" }),
            };
        }

        if self.mailer.test_connection().await {
            let user = if self.config.smtp.username.is_some() {
                "***configured***"
            } else {
                "not configured"
            };
            ApiReply {
                status: 200,
                body: json!({
                    "success": true,
                    "message": "Email configuration is working!",
                    "smtp": {
                        "host": self.config.smtp.host,
                        "port": self.config.smtp.port,
                        "user": user,
                    },
                }),
            }
        } else {
            ApiReply {
                status: 500,
                body: json!({
                    "success": false,
                    "message": "Email configuration failed",
                    "error": "SMTP connection test failed",
                }),
            }
        }
    }

    /// Liveness probe payload.
    pub fn health(&self) -> ApiReply {
        ApiReply {
            status: 200,
            body: json!({
                "status": "OK",
                "timestamp": Utc::now().to_rfc3339(),
                "service": "Hotel Boss Booking API",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": self.config.environment.as_str(),
            }),
        }
    }

    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }

    fn failure_reply(&self, err: BookingError, started: Instant) -> ApiReply {
        error!(error = %err, kind = err.error_type(), "booking failed");

        let mut error_obj = json!({ "type": err.error_type() });
        if !self.config.environment.is_production() {
            if let Some(details) = err.details() {
                error_obj["details"] = json!(details);
            }
        }

        let mut meta = self.meta(started);
        meta["supportInfo"] = json!({
            "email": self.config.hotel_email,
            "phone": self.config.support_phone,
        });

        ApiReply {
            status: err.status_code(),
            body: json!({
                "success": false,
                "message": err.to_string(),
                "error": error_obj,
                "meta": meta,
            }),
        }
    }

    fn meta(&self, started: Instant) -> Value {
        json!({
            "processingTime": format!("{}ms", started.elapsed().as_millis()),
            "timestamp": Utc::now().to_rfc3339(),
        })
    }
}
