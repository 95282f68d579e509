use serde::Deserialize;

/// The single field posted by the page's form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValuationForm {
    /// Free-text property and agent details, passed to the model verbatim.
    #[serde(default)]
    pub user_input: String,
}

/// A generated report, ready for the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBody {
    /// Sanitised HTML converted from the model's Markdown.
    Html(String),
    /// The completion as returned; escaped by the template.
    Text(String),
}
