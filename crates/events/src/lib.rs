//! Outbound notifications for the bookstore.
//!
//! - [`delivery`]: the [`Mailer`] seam, its SMTP implementation and a
//!   log-only fallback used when SMTP is not configured.
//! - [`notice`]: the emails sent to applicants once their seller request
//!   has been decided.

pub mod delivery;
pub mod notice;

pub use delivery::email::{EmailConfig, EmailError, LogMailer, Mailer, SmtpMailer};
pub use notice::{DecisionNotice, Recipient};
