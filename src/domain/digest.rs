//! Email digest rendering: one digest per topic, HTML and plain-text parts.

use crate::domain::DraftedLead;

const DEFAULT_GROUP_NAME: &str = "Facebook Group";
const TEXT_SEPARATOR: &str = "\n-----------------------------\n";

/// A rendered email ready for the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Render the digest for one topic. `label` is the topic display name.
pub fn render_digest(label: &str, leads: &[DraftedLead]) -> Digest {
    let count = leads.len();
    let subject = format!("NEW Facebook {} Leads ({})", label, count);

    let html_blocks = leads
        .iter()
        .enumerate()
        .map(|(idx, d)| html_block(idx + 1, d))
        .collect::<Vec<_>>()
        .join("\n");

    let html = format!(
        "\n    <h2>Facebook {label} Leads Summary</h2>\n    <p>Found {count} potential leads across your groups.</p>\n    <hr/>\n    {html_blocks}\n  ",
        label = escape_html(label),
    );

    let text_blocks = leads
        .iter()
        .enumerate()
        .map(|(idx, d)| text_block(idx + 1, d))
        .collect::<Vec<_>>()
        .join(TEXT_SEPARATOR);

    let text = format!(
        "\nFacebook {label} Leads Summary\nFound {count} potential leads.\n\n{text_blocks}\n"
    )
    .trim()
    .to_string();

    Digest {
        subject,
        html,
        text,
    }
}

fn group_name(d: &DraftedLead) -> &str {
    d.lead.group_name.as_deref().unwrap_or(DEFAULT_GROUP_NAME)
}

fn html_block(n: usize, d: &DraftedLead) -> String {
    let url = escape_html(&d.lead.group_url);
    let link = match &d.lead.post_link {
        Some(l) => {
            let l = escape_html(l);
            format!("<a href=\"{l}\" target=\"_blank\">{l}</a>")
        }
        None => "(no direct link, open the group and scroll)".to_string(),
    };
    format!(
        r#"
        <h3>{n}. {name}</h3>
        <p><strong>Group URL:</strong> <a href="{url}" target="_blank">{url}</a></p>
        <p><strong>Post snippet:</strong></p>
        <p style="white-space: pre-wrap;">{text}</p>
        <p><strong>Approx link (if captured):</strong> {link}</p>
        <p><strong>Suggested reply:</strong></p>
        <p style="white-space: pre-wrap;">{reply}</p>
        <hr/>
      "#,
        name = escape_html(group_name(d)),
        text = escape_html(&d.lead.text),
        reply = escape_html(&d.suggested_reply),
    )
}

fn text_block(n: usize, d: &DraftedLead) -> String {
    format!(
        "\n{n}. {name}\nGroup URL: {url}\nPost snippet:\n{text}\n\nPost link (if captured): {link}\n\nSuggested reply:\n{reply}\n",
        name = group_name(d),
        url = d.lead.group_url,
        text = d.lead.text,
        link = d.lead.post_link.as_deref().unwrap_or("open group and scroll"),
        reply = d.suggested_reply,
    )
}

/// Minimal HTML escaping for text interpolated into the digest body.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
