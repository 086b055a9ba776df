// Core library for the hotel booking intake service

// Modules along the request path, leaves first
pub mod booking;
pub mod config;
pub mod mailer;
pub mod rate_limit;
pub mod service;
pub mod templates;
pub mod validator;

// Re-export key types for convenience
pub use booking::{Booking, BookingConfirmation, BookingRecord, RawBooking, RoomType};
pub use config::{AppConfig, Environment, SmtpConfig};
pub use mailer::{
    MailError, MailTransport, Mailer, MailerConfig, OutgoingEmail, SendReceipt, TransportError,
};
pub use rate_limit::{Admission, SlidingWindowLimiter};
pub use service::{ApiReply, BookingError, BookingService, ClientMeta};
pub use validator::Validator;
