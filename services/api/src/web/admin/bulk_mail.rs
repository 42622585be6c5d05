//! services/api/src/web/admin/bulk_mail.rs
//!
//! The bulk email path: collect every subscriber, send one HTML message to all
//! of them through a single transport session, then persist one record of the
//! attempt. Nothing is retried and partial delivery is not tracked.

use chrono::Utc;
use portal_core::domain::{EmailAddress, NewSentEmail, OutboundEmail, RecordId, SendOutcome};
use portal_core::ports::{DatabaseService, MailService, PortError, PortResult};
use tracing::{error, info, warn};

/// Wraps the admin-authored body in a minimal HTML document. The body is
/// trusted HTML; only the subject is escaped.
pub fn render_html(subject: &str, content: &str) -> String {
    format!(
        "<html>\n  <head>\n    <title>{}</title>\n  </head>\n  <body>\n{}\n  </body>\n</html>\n",
        escape_html(subject),
        content
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sends `title`/`content` to every subscriber and returns the id of the
/// persisted send record.
///
/// Exactly one record is written per call, whatever the number of
/// subscribers. A failed delivery is recorded with outcome `failed` and the
/// mailer's error is then returned unchanged in kind; transport failures also
/// name the recorded attempt.
pub async fn dispatch(
    db: &dyn DatabaseService,
    mailer: &dyn MailService,
    title: &str,
    content: &str,
) -> PortResult<RecordId> {
    if title.trim().is_empty() {
        return Err(PortError::Validation("title must not be empty".to_string()));
    }

    let subscribers = db.list_subscribers().await?;
    let mut recipients = Vec::with_capacity(subscribers.len());
    for subscriber in subscribers {
        match EmailAddress::parse(&subscriber.email) {
            Ok(address) => recipients.push(address),
            Err(e) => warn!("Skipping subscriber {}: {}", subscriber.id, e),
        }
    }

    let html_body = render_html(title, content);
    let sent_at = Utc::now();

    let delivery = if recipients.is_empty() {
        info!("No subscribers to email; skipping the transport");
        Ok(())
    } else {
        let email = OutboundEmail {
            recipients: recipients.clone(),
            subject: title.to_string(),
            html_body: html_body.clone(),
        };
        mailer.send_html(&email).await
    };

    let (outcome, failure) = match &delivery {
        Ok(()) => (SendOutcome::Sent, None),
        Err(PortError::Transport(message)) => (SendOutcome::Failed, Some(message.clone())),
        Err(other) => (SendOutcome::Failed, Some(other.to_string())),
    };

    let record = NewSentEmail {
        recipients: recipients.iter().map(ToString::to_string).collect(),
        sender: mailer.sender().to_string(),
        title: title.to_string(),
        content: html_body,
        sent_at,
        outcome,
        error: failure,
    };

    let id = db.save_sent_email(record).await.map_err(|e| {
        error!("Bulk email {:?} but its record was not saved: {}", outcome, e);
        e
    })?;

    match delivery {
        Ok(()) => {
            info!("Bulk email {} sent to {} recipients", id, recipients.len());
            Ok(id)
        }
        Err(PortError::Transport(message)) => {
            error!("Bulk email {} failed: {}", id, message);
            Err(PortError::Transport(format!(
                "{} (attempt recorded as {})",
                message, id
            )))
        }
        Err(other) => {
            error!("Bulk email {} was not sent: {}", id, other);
            Err(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_document_wraps_body_and_escapes_subject() {
        let html = render_html("News & <offers>", "<p>Hello</p>");
        assert!(html.contains("<title>News &amp; &lt;offers&gt;</title>"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.starts_with("<html>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_html("Weekly digest"), "Weekly digest");
        assert_eq!(escape_html("\"it's\""), "&quot;it&#39;s&quot;");
    }
}
