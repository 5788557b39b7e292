//! Error types for adfctl
//!
//! Library errors are folded into [`AdfCtlError`], which knows how to print
//! itself as a cargo-style diagnostic with suggestions.

use colored::Colorize;
use datafactory_core::CoreError;
use datafactory_core::config::ConfigError;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: no resource group given
///
///   tip: pass --resource-group, or set resource_group on the profile
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the adfctl application
#[derive(Error, Debug)]
pub enum AdfCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'adfctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("No {what} given")]
    MissingScope {
        what: &'static str,
        flag: &'static str,
        field: &'static str,
    },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("{message}")]
    ApiError {
        message: String,
        request_id: Option<String>,
    },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Cancelled")]
    Cancelled,

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for adfctl operations
pub type Result<T> = std::result::Result<T, AdfCtlError>;

impl AdfCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AdfCtlError::ProfileNotFound { name } => vec![
                "List available profiles: adfctl profile list".to_string(),
                format!(
                    "Create profile '{}': adfctl profile set {} --subscription-id <id> --access-token <token>",
                    name, name
                ),
            ],
            AdfCtlError::NoProfileConfigured => vec![
                "Create a profile: adfctl profile set <name> --subscription-id <id> --access-token <token>".to_string(),
                "Or export AZURE_SUBSCRIPTION_ID and AZURE_ACCESS_TOKEN".to_string(),
            ],
            AdfCtlError::MissingScope { flag, field, .. } => vec![format!(
                "Pass {}, or set {} on the profile: adfctl profile set <name> ... {} <value>",
                flag, field, flag
            )],
            AdfCtlError::AuthenticationFailed { .. } => vec![
                "Access tokens expire; fetch a fresh one and update the profile".to_string(),
                "Check which profile is in use: adfctl profile list".to_string(),
            ],
            AdfCtlError::NotFound { .. } => vec![
                "List registered activity types: adfctl activity-type list".to_string(),
                "Check the resource group and factory names".to_string(),
            ],
            AdfCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the API URL: adfctl profile show <profile>".to_string(),
            ],
            AdfCtlError::Timeout { .. } => vec![
                "Raise the limit with --wait-timeout, or return early with --no-wait".to_string(),
            ],
            AdfCtlError::InvalidInput { .. } => vec![
                "Check the command syntax: adfctl <command> --help".to_string(),
            ],
            AdfCtlError::FileError { path, .. } => vec![
                format!("Check that file exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AdfCtlError::Cancelled => 130,
            _ => 1,
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let AdfCtlError::ApiError {
            request_id: Some(id),
            ..
        } = self
        {
            diag = diag.detail(&format!("request id: {}", id));
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<CoreError> for AdfCtlError {
    fn from(err: CoreError) -> Self {
        if err.is_unauthorized() {
            return AdfCtlError::AuthenticationFailed {
                message: err.to_string(),
            };
        }
        if err.is_not_found() {
            return AdfCtlError::NotFound {
                message: err.to_string(),
            };
        }

        match err {
            CoreError::Validation(message) => AdfCtlError::InvalidInput { message },
            CoreError::Config(message) => AdfCtlError::Config(message),
            CoreError::OperationTimeout(duration) => AdfCtlError::Timeout {
                message: format!("Operation timed out after {} seconds", duration.as_secs()),
            },
            CoreError::OperationFailed { code, message } => AdfCtlError::OperationFailed {
                message: match code {
                    Some(code) => format!("{} ({})", message, code),
                    None => message,
                },
            },
            CoreError::Cancelled => AdfCtlError::Cancelled,
            CoreError::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                AdfCtlError::ConnectionError {
                    message: err.to_string(),
                }
            }
            CoreError::Api { ref request_id, .. } => AdfCtlError::ApiError {
                request_id: request_id.clone(),
                message: err.to_string(),
            },
            other => AdfCtlError::ApiError {
                message: other.to_string(),
                request_id: None,
            },
        }
    }
}

impl From<ConfigError> for AdfCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => AdfCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => AdfCtlError::NoProfileConfigured,
            other => AdfCtlError::Config(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AdfCtlError {
    fn from(err: serde_json::Error) -> Self {
        AdfCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for AdfCtlError {
    fn from(err: std::io::Error) -> Self {
        AdfCtlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for AdfCtlError {
    fn from(err: anyhow::Error) -> Self {
        AdfCtlError::Config(format!("{:#}", err))
    }
}
