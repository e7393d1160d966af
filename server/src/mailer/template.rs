//! Email templates
//!
//! Templates are HTML files with `{{placeholder}}` markers. A work-dir
//! override is consulted first; the compiled-in defaults are the fallback.

use std::path::Path;

use url::Url;

/// Known email template types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    ForgotPassword,
    ResetPassword,
    Welcome,
}

impl EmailTemplate {
    /// File name under the templates directory
    pub fn file_name(&self) -> &'static str {
        match self {
            EmailTemplate::ForgotPassword => "forgot-password.html",
            EmailTemplate::ResetPassword => "reset-password.html",
            EmailTemplate::Welcome => "welcome.html",
        }
    }

    /// Subject line
    pub fn subject(&self) -> &'static str {
        match self {
            EmailTemplate::ForgotPassword => "Reset your password",
            EmailTemplate::ResetPassword => "Your password was changed",
            EmailTemplate::Welcome => "Welcome aboard",
        }
    }

    fn from_typ(typ: &str) -> Option<Self> {
        match typ {
            "forgot-password" => Some(EmailTemplate::ForgotPassword),
            "reset-password" => Some(EmailTemplate::ResetPassword),
            "welcome" => Some(EmailTemplate::Welcome),
            _ => None,
        }
    }

    /// Compiled-in default body
    pub fn default_body(&self) -> &'static str {
        match self {
            EmailTemplate::ForgotPassword => include_str!("../../templates/forgot-password.html"),
            EmailTemplate::ResetPassword => include_str!("../../templates/reset-password.html"),
            EmailTemplate::Welcome => include_str!("../../templates/welcome.html"),
        }
    }
}

/// Nested callbackURL parameters are followed at most this deep
const MAX_CALLBACK_DEPTH: usize = 4;

/// Resolve the template type from a callback URL.
///
/// Pure function of the `typ` query parameter. When `typ` is absent the
/// `callbackURL` parameter (percent-encoded) is unwrapped and searched
/// recursively. Absent or malformed input falls back to forgot-password.
pub fn resolve_template(callback_url: Option<&str>) -> EmailTemplate {
    fn resolve(raw: &str, depth: usize) -> Option<EmailTemplate> {
        if depth > MAX_CALLBACK_DEPTH {
            return None;
        }
        // Relative URLs are valid callbacks; give them a synthetic base
        let parsed = Url::parse(raw)
            .or_else(|_| Url::parse("http://localhost").and_then(|base| base.join(raw)))
            .ok()?;

        let mut nested: Option<String> = None;
        for (key, value) in parsed.query_pairs() {
            if key == "typ"
                && let Some(t) = EmailTemplate::from_typ(&value)
            {
                return Some(t);
            }
            if key == "callbackURL" {
                nested = Some(value.into_owned());
            }
        }

        nested.and_then(|inner| resolve(&inner, depth + 1))
    }

    callback_url
        .and_then(|raw| resolve(raw, 0))
        .unwrap_or(EmailTemplate::ForgotPassword)
}

/// Substitute `{{key}}` placeholders in a template body.
pub fn render(body: &str, vars: &[(&str, &str)]) -> String {
    let mut out = body.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

/// Load the template body: work-dir override first, built-in default second.
pub fn load_body(templates_dir: &Path, template: EmailTemplate) -> String {
    let override_path = templates_dir.join(template.file_name());
    match std::fs::read_to_string(&override_path) {
        Ok(body) => body,
        Err(_) => template.default_body().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typ_param_selects_template() {
        assert_eq!(
            resolve_template(Some("https://app.example.com/reset?typ=reset-password")),
            EmailTemplate::ResetPassword
        );
        assert_eq!(
            resolve_template(Some("https://app.example.com/x?typ=welcome")),
            EmailTemplate::Welcome
        );
    }

    #[test]
    fn defaults_to_forgot_password() {
        assert_eq!(resolve_template(None), EmailTemplate::ForgotPassword);
        assert_eq!(
            resolve_template(Some("https://app.example.com/reset")),
            EmailTemplate::ForgotPassword
        );
        assert_eq!(
            resolve_template(Some("not a url at all \u{0}")),
            EmailTemplate::ForgotPassword
        );
        assert_eq!(
            resolve_template(Some("https://a.example/x?typ=unknown-kind")),
            EmailTemplate::ForgotPassword
        );
    }

    #[test]
    fn typ_nested_in_encoded_callback_url() {
        // typ lives inside the percent-encoded callbackURL parameter
        let url = "https://api.example.com/verify?callbackURL=https%3A%2F%2Fapp.example.com%2Freset%3Ftyp%3Dreset-password";
        assert_eq!(resolve_template(Some(url)), EmailTemplate::ResetPassword);
    }

    #[test]
    fn doubly_nested_callback_url() {
        let inner = "https://app.example.com/done?typ=welcome";
        let mid = format!(
            "https://api.example.com/cb?callbackURL={}",
            url::form_urlencoded::byte_serialize(inner.as_bytes()).collect::<String>()
        );
        let outer = format!(
            "https://gw.example.com/auth?callbackURL={}",
            url::form_urlencoded::byte_serialize(mid.as_bytes()).collect::<String>()
        );
        assert_eq!(resolve_template(Some(&outer)), EmailTemplate::Welcome);
    }

    #[test]
    fn relative_callback_url_is_accepted() {
        assert_eq!(
            resolve_template(Some("/reset?typ=reset-password")),
            EmailTemplate::ResetPassword
        );
    }

    #[test]
    fn direct_typ_wins_over_nested() {
        let url = "https://a.example/x?typ=welcome&callbackURL=https%3A%2F%2Fb.example%2Fy%3Ftyp%3Dreset-password";
        assert_eq!(resolve_template(Some(url)), EmailTemplate::Welcome);
    }

    #[test]
    fn render_substitutes_placeholders() {
        let out = render(
            "<p>Hello {{name}},</p><a href=\"{{link}}\">reset</a> token={{token}}",
            &[("name", "Maria"), ("link", "http://x/y"), ("token", "abc123")],
        );
        assert_eq!(
            out,
            "<p>Hello Maria,</p><a href=\"http://x/y\">reset</a> token=abc123"
        );
    }

    #[test]
    fn render_leaves_unknown_placeholders_alone() {
        let out = render("hi {{name}} {{unknown}}", &[("name", "A")]);
        assert_eq!(out, "hi A {{unknown}}");
    }
}
