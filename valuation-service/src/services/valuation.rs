//! Report generation for a single form submission.

use super::markdown::markdown_to_html;
use super::prompt::build_prompt;
use super::providers::{FinishReason, GenerationParams, ProviderError, TextProvider};
use crate::models::ReportBody;
use chrono::Local;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;

/// Shown when no Gemini credential is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Error: GOOGLE_API_KEY missing.";

#[derive(Error, Debug)]
pub enum ValuationError {
    #[error("GOOGLE_API_KEY missing.")]
    MissingCredential,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ValuationError {
    /// Text for the page's error banner.
    pub fn user_message(&self) -> String {
        match self {
            ValuationError::MissingCredential => MISSING_CREDENTIAL_MESSAGE.to_string(),
            ValuationError::Provider(e) => format!("Error: {}", e),
        }
    }

    fn outcome_label(&self) -> &'static str {
        match self {
            ValuationError::MissingCredential => "missing_credential",
            ValuationError::Provider(ProviderError::RateLimited(_)) => "rate_limited",
            ValuationError::Provider(ProviderError::ContentFiltered(_)) => "content_filtered",
            ValuationError::Provider(ProviderError::EmptyResponse) => "empty_response",
            ValuationError::Provider(ProviderError::NetworkError(_)) => "network_error",
            ValuationError::Provider(_) => "api_error",
        }
    }
}

/// How the completion is shown on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Markdown,
    PlainText,
}

impl RenderMode {
    pub fn from_flag(render_markdown: bool) -> Self {
        if render_markdown {
            RenderMode::Markdown
        } else {
            RenderMode::PlainText
        }
    }
}

#[derive(Clone)]
pub struct ValuationService {
    provider: Option<Arc<dyn TextProvider>>,
    params: GenerationParams,
    render_mode: RenderMode,
}

impl ValuationService {
    /// `provider` is `None` when no credential is configured; every request
    /// then fails with [`ValuationError::MissingCredential`].
    pub fn new(
        provider: Option<Arc<dyn TextProvider>>,
        params: GenerationParams,
        render_mode: RenderMode,
    ) -> Self {
        Self {
            provider,
            params,
            render_mode,
        }
    }

    pub fn provider(&self) -> Option<&Arc<dyn TextProvider>> {
        self.provider.as_ref()
    }

    #[tracing::instrument(skip_all, fields(input_len = user_input.len()))]
    pub async fn generate_report(&self, user_input: &str) -> Result<ReportBody, ValuationError> {
        let result = self.generate(user_input).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome_label(),
        };
        counter!("valuation_reports_total", "outcome" => outcome).increment(1);

        result
    }

    async fn generate(&self, user_input: &str) -> Result<ReportBody, ValuationError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(ValuationError::MissingCredential)?;

        let prompt = build_prompt(user_input, Local::now().date_naive());
        let response = provider.generate(&prompt, &self.params).await?;

        tracing::info!(
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Received completion"
        );
        if response.finish_reason == FinishReason::Length {
            tracing::warn!("Completion truncated at the output token limit");
        }

        let text = response
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(match self.render_mode {
            RenderMode::Markdown => ReportBody::Html(markdown_to_html(&text)),
            RenderMode::PlainText => ReportBody::Text(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;

    fn service(provider: &Arc<MockTextProvider>, render_mode: RenderMode) -> ValuationService {
        ValuationService::new(
            Some(provider.clone() as Arc<dyn TextProvider>),
            GenerationParams::default(),
            render_mode,
        )
    }

    #[tokio::test]
    async fn missing_credential_skips_provider() {
        let service = ValuationService::new(None, GenerationParams::default(), RenderMode::Markdown);

        let err = service.generate_report("123 Main St").await.unwrap_err();

        assert!(matches!(err, ValuationError::MissingCredential));
        assert_eq!(err.user_message(), "Error: GOOGLE_API_KEY missing.");
    }

    #[tokio::test]
    async fn sends_prompt_with_input_once() {
        let provider = Arc::new(MockTextProvider::replying("# Report"));
        let service = service(&provider, RenderMode::Markdown);

        service.generate_report("742 Evergreen Terrace").await.unwrap();

        assert_eq!(provider.calls(), 1);
        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("742 Evergreen Terrace"));
        assert!(prompt.contains("You are **Simon**"));
    }

    #[tokio::test]
    async fn markdown_mode_converts_completion() {
        let provider = Arc::new(MockTextProvider::replying("**Sold: $410,000**"));
        let report = service(&provider, RenderMode::Markdown)
            .generate_report("x")
            .await
            .unwrap();

        assert_eq!(
            report,
            ReportBody::Html("<p><strong>Sold: $410,000</strong></p>\n".to_string())
        );
    }

    #[tokio::test]
    async fn plain_mode_keeps_raw_text() {
        let provider = Arc::new(MockTextProvider::replying("**Sold: $410,000**"));
        let report = service(&provider, RenderMode::PlainText)
            .generate_report("x")
            .await
            .unwrap();

        assert_eq!(report, ReportBody::Text("**Sold: $410,000**".to_string()));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_text() {
        let provider = Arc::new(MockTextProvider::failing("quota exhausted for project"));
        let err = service(&provider, RenderMode::Markdown)
            .generate_report("x")
            .await
            .unwrap_err();

        assert_eq!(
            err.user_message(),
            "Error: API error: quota exhausted for project"
        );
    }

    #[tokio::test]
    async fn blank_completion_is_an_error() {
        let provider = Arc::new(MockTextProvider::replying("  \n"));
        let err = service(&provider, RenderMode::Markdown)
            .generate_report("x")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ValuationError::Provider(ProviderError::EmptyResponse)
        ));
    }
}
