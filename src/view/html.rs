//! HTML rendering of messages and stat entries.

use crate::session::avatar;
use crate::view::MessageRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MessageRenderer for HtmlRenderer {
    type Node = String;

    fn render_message(&self, username: &str, text: &str, timestamp: &str) -> String {
        let mut html = String::with_capacity(256 + text.len());
        html.push_str("<div class=\"message\">");
        push_avatar(&mut html, username);
        html.push_str("<div class=\"message-body\">");
        html.push_str(&format!("<div class=\"message-user\">{}</div>", escape_html(username)));
        html.push_str(&format!("<div class=\"message-text\">{}</div>", escape_html(text)));
        html.push_str(&format!("<div class=\"message-time\">{}</div>", escape_html(timestamp)));
        html.push_str("</div></div>");
        html
    }

    fn render_stat_entry(&self, username: &str, count: u32) -> String {
        let mut html = String::with_capacity(192);
        html.push_str("<div class=\"user-card\">");
        push_avatar(&mut html, username);
        html.push_str(&format!("<div class=\"user-name\">{}</div>", escape_html(username)));
        html.push_str(&format!("<div class=\"user-count\">{count} messages</div>"));
        html.push_str("</div>");
        html
    }
}

fn push_avatar(html: &mut String, username: &str) {
    html.push_str(&format!(
        "<div class=\"avatar\" style=\"background-color:{}\">{}</div>",
        avatar::css_color_for(username),
        escape_html(&avatar::initial_for(username))
    ));
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_markup_escapes_user_content() {
        let html = HtmlRenderer.render_message("<b>", "a & b", "12:00:00");
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("12:00:00"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn stat_entry_shows_initial_color_and_count() {
        let html = HtmlRenderer.render_stat_entry("alice", 4);
        assert!(html.contains(">A</div>"));
        assert!(html.contains(&avatar::css_color_for("alice")));
        assert!(html.contains("4 messages"));
    }

    #[test]
    fn empty_name_gets_placeholder_avatar() {
        let html = HtmlRenderer.render_stat_entry("", 1);
        assert!(html.contains(">?</div>"));
        assert!(html.contains("#8b5cf6"));
    }
}
