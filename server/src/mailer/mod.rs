//! 邮件发送模块
//!
//! HTML 由磁盘模板渲染（`{{placeholder}}` 占位符替换），通过外部 HTTP
//! 邮件 API 发送。未配置 API 时仅记录日志，不视为错误。

pub mod template;

pub use template::{EmailTemplate, render, resolve_template};

use std::path::PathBuf;

use serde::Serialize;

use crate::utils::AppError;

/// Outgoing message payload for the email API
#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Mailer service
#[derive(Debug, Clone)]
pub struct Mailer {
    /// POST endpoint of the email provider; None disables sending
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
    templates_dir: PathBuf,
    client: reqwest::Client,
}

impl Mailer {
    pub fn new(
        api_url: Option<String>,
        api_key: Option<String>,
        from: String,
        templates_dir: PathBuf,
    ) -> Self {
        Self {
            api_url,
            api_key,
            from,
            templates_dir,
            client: reqwest::Client::new(),
        }
    }

    /// Render a template and send it.
    ///
    /// `vars` are `{{placeholder}}` substitutions. With no API configured the
    /// message is logged and dropped.
    pub async fn send_template(
        &self,
        to: &str,
        template: EmailTemplate,
        vars: &[(&str, &str)],
    ) -> Result<(), AppError> {
        let body = template::load_body(&self.templates_dir, template);
        let html = render(&body, vars);
        self.send(to, template.subject(), &html).await
    }

    /// Send raw HTML through the configured provider.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        let Some(api_url) = &self.api_url else {
            tracing::warn!(to = %to, subject = %subject, "Email API not configured, dropping email");
            return Ok(());
        };

        let payload = OutgoingEmail {
            from: &self.from,
            to,
            subject,
            html,
        };

        let mut request = self.client.post(api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Email API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::internal(format!(
                "Email API returned {status}: {text}"
            )));
        }

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}
