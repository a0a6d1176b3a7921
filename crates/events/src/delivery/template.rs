//! HTML body for notification emails.

/// Product name shown in the email header and footer.
const PRODUCT_NAME: &str = "FreelanceBot";

/// Render the notification email body.
///
/// Every interpolated value is HTML-escaped. A missing or blank display name
/// falls back to "there".
pub fn render_notification_email(
    subject: &str,
    message: &str,
    display_name: Option<&str>,
    dashboard_url: &str,
) -> String {
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("there");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; text-align: center;">
    <h1 style="color: white; margin: 0; font-size: 28px;">{product}</h1>
  </div>
  <div style="padding: 30px; background: #f8f9fa;">
    <h2 style="color: #333; margin-bottom: 20px;">{subject}</h2>
    <p style="color: #666; line-height: 1.6; margin-bottom: 20px;">Hello {name},</p>
    <p style="color: #666; line-height: 1.6; margin-bottom: 30px;">{message}</p>
    <div style="text-align: center;">
      <a href="{url}" style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 12px 30px; text-decoration: none; border-radius: 6px; display: inline-block;">View Dashboard</a>
    </div>
  </div>
  <div style="padding: 20px; text-align: center; color: #999; font-size: 12px;">
    <p>&copy; {product}. All rights reserved.</p>
  </div>
</div>"#,
        product = PRODUCT_NAME,
        subject = escape_html(subject),
        name = escape_html(name),
        message = escape_html(message),
        url = escape_html(dashboard_url),
    )
}

/// Dashboard link for a configured application base URL.
pub fn dashboard_url(app_base_url: &str) -> String {
    format!("{}/dashboard", app_base_url.trim_end_matches('/'))
}

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_by_display_name() {
        let html = render_notification_email("Subject", "Body", Some("Ada"), "http://x/dashboard");
        assert!(html.contains("Hello Ada,"));
        assert!(html.contains("href=\"http://x/dashboard\""));
        assert!(html.contains("View Dashboard"));
    }

    #[test]
    fn blank_name_falls_back_to_there() {
        let html = render_notification_email("S", "B", Some("  "), "u");
        assert!(html.contains("Hello there,"));
        let html = render_notification_email("S", "B", None, "u");
        assert!(html.contains("Hello there,"));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let html = render_notification_email(
            "New Message for \"<b>Site</b>\"",
            "a & b",
            Some("<script>"),
            "u",
        );
        assert!(html.contains("New Message for &quot;&lt;b&gt;Site&lt;/b&gt;&quot;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn dashboard_url_strips_trailing_slash() {
        assert_eq!(dashboard_url("https://app.example/"), "https://app.example/dashboard");
        assert_eq!(dashboard_url("https://app.example"), "https://app.example/dashboard");
    }
}
