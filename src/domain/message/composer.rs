use uuid::Uuid;

use super::{NamedAddress, OutboundEmail, SenderProfile};
use crate::domain::submission::ValidSubmission;

const SUBJECT_PREFIX: &str = "My Portfolio - Message from";

/// Builds the email the relay hands to the transport.
///
/// Replies go to the submitter, not to the relay's own mailbox.
pub fn compose(submission: &ValidSubmission, sender: &SenderProfile) -> OutboundEmail {
    let domain = sender
        .address
        .rsplit_once('@')
        .map(|(_, d)| d)
        .unwrap_or("localhost");

    OutboundEmail {
        message_id: format!("<{}@{}>", Uuid::new_v4(), domain),
        from: NamedAddress::new(sender.display_name.clone(), sender.address.clone()),
        to: NamedAddress::bare(sender.recipient.clone()),
        reply_to: NamedAddress::new(submission.name.clone(), submission.email.clone()),
        subject: format!("{} {}", SUBJECT_PREFIX, submission.name),
        text_body: submission.message.clone(),
        html_body: render_html(submission),
    }
}

fn render_html(submission: &ValidSubmission) -> String {
    let body = escape_html(&submission.message)
        .replace("\r\n", "<br>")
        .replace('\n', "<br>");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Message from Portfolio Contact Form</h2>
  <div style="margin: 20px 0; padding: 15px; background: #f8fafc; border-radius: 8px;">
    <p><strong>From:</strong> {name} &lt;{email}&gt;</p>
    <p><strong>Message:</strong></p>
    <div style="white-space: pre-line; margin-top: 10px; line-height: 1.6;">{body}</div>
  </div>
  <p style="color: #64748b; font-size: 0.9em; margin-top: 20px;">
    This message was sent from your portfolio contact form.
  </p>
</div>"#,
        name = escape_html(&submission.name),
        email = escape_html(&submission.email),
        body = body,
    )
}

pub fn escape_html(input: &str) -> String {
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
