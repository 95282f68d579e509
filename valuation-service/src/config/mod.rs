use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Gemini REST API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash-exp";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct ValuationConfig {
    pub common: core_config::Config,
    pub models: ModelConfig,
    pub google: GoogleConfig,
    pub report: ReportConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for report generation (e.g., gemini-2.0-flash-exp)
    pub text_model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// `None` when GOOGLE_API_KEY is unset or blank. The service still starts
    /// and reports the missing credential on each submission.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Convert the completion from Markdown to HTML before display.
    pub render_markdown: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    pub otlp_endpoint: Option<String>,
}

impl ValuationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").as_deref() == Some("prod");
        let vars = Vars { lookup, is_prod };

        Ok(ValuationConfig {
            common,
            models: ModelConfig {
                text_model: vars.get("GENAI_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL))?,
                temperature: vars.parsed_optional("GENAI_TEMPERATURE")?,
                max_output_tokens: vars.parsed_optional("GENAI_MAX_OUTPUT_TOKENS")?,
            },
            google: GoogleConfig {
                api_key: vars.optional("GOOGLE_API_KEY").map(Secret::new),
                api_base: vars.get("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?,
                request_timeout_secs: vars.parsed(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
            report: ReportConfig {
                render_markdown: vars.parsed("VALUATION_RENDER_MARKDOWN", true)?,
            },
            observability: ObservabilityConfig {
                otlp_endpoint: vars.optional("OTLP_ENDPOINT"),
            },
        })
    }

    pub fn has_credential(&self) -> bool {
        self.google.api_key.is_some()
    }
}

struct Vars<F> {
    lookup: F,
    is_prod: bool,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn get(&self, key: &str, default: Option<&str>) -> Result<String, AppError> {
        match self.optional(key) {
            Some(val) => Ok(val),
            None => {
                if self.is_prod {
                    Err(AppError::ConfigError(anyhow::anyhow!(
                        "{} is required in production but not set",
                        key
                    )))
                } else if let Some(def) = default {
                    Ok(def.to_string())
                } else {
                    Err(AppError::ConfigError(anyhow::anyhow!(
                        "{} is required but not set",
                        key
                    )))
                }
            }
        }
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parsed_optional(key)?.unwrap_or(default))
    }

    fn parsed_optional<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("{} has invalid value {:?}: {}", key, raw, e))
                })
            })
            .transpose()
    }
}
