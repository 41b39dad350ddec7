//! Emails sent to an applicant once their seller request has been decided.

use librairie_core::seller_request::Decision;

use crate::delivery::email::{EmailError, Mailer};

/// Signature shared by every notice.
const SIGNATURE: &str = "<p>Kind regards,</p>\n<p>The J-Librairie team</p>";

/// Who receives a decision notice.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub email: String,
    pub name: String,
    pub surname: String,
}

/// A rendered decision email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionNotice {
    pub subject: String,
    pub html: String,
}

impl DecisionNotice {
    pub fn render(recipient: &Recipient, decision: &Decision) -> Self {
        let greeting = format!(
            "<p>Hello {} {},</p>",
            escape_html(&recipient.name),
            escape_html(&recipient.surname)
        );

        match decision {
            Decision::Confirm => Self {
                subject: "Your seller request has been accepted".to_string(),
                html: format!(
                    "<h1>Your request has been accepted</h1>\n{greeting}\n\
                     <p>We are pleased to let you know that your request to become a seller \
                     has been accepted. You can now publish books.</p>\n{SIGNATURE}"
                ),
            },
            Decision::Refuse { reason } => Self {
                subject: "Your seller request has been refused".to_string(),
                html: format!(
                    "<h1>Your request has been refused</h1>\n{greeting}\n\
                     <p>We regret to inform you that your request to become a seller \
                     has been refused.</p>\n<p>Reason: {}</p>\n{SIGNATURE}",
                    escape_html(reason)
                ),
            },
        }
    }

    /// Render and send the notice for `decision` to `recipient`.
    pub async fn send(
        mailer: &dyn Mailer,
        recipient: &Recipient,
        decision: &Decision,
    ) -> Result<(), EmailError> {
        let notice = Self::render(recipient, decision);
        mailer.send(&recipient.email, &notice.subject, &notice.html).await
    }
}

/// Escape text for interpolation into HTML element content.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
