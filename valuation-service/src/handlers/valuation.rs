use crate::models::{ReportBody, ValuationForm};
use crate::startup::AppState;
use askama::Template;
use axum::{extract::State, Form};

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub error: Option<String>,
    /// Converted report, inserted without escaping.
    pub report_html: Option<String>,
    /// Raw report text, escaped and shown preformatted.
    pub report_text: Option<String>,
}

impl IndexTemplate {
    fn with_report(report: ReportBody) -> Self {
        match report {
            ReportBody::Html(html) => Self {
                report_html: Some(html),
                ..Self::default()
            },
            ReportBody::Text(text) => Self {
                report_text: Some(text),
                ..Self::default()
            },
        }
    }

    fn with_error(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

/// Empty form.
pub async fn index() -> IndexTemplate {
    IndexTemplate::default()
}

/// Generate a report from the submitted details and render it into the page.
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ValuationForm>,
) -> IndexTemplate {
    match state.valuation.generate_report(&form.user_input).await {
        Ok(report) => IndexTemplate::with_report(report),
        Err(e) => {
            tracing::warn!(error = %e, "Valuation report failed");
            IndexTemplate::with_error(e.user_message())
        }
    }
}
