//! Outbound mail delivery
//!
//! One authenticated STARTTLS SMTP session per report. All addressing and
//! credential problems are surfaced before any network call.

pub mod sender;

pub use sender::{parse_recipients, MailError, Mailer};
