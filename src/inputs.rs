//! Action input surface and validated resolver configuration.
//!
//! The Actions runner exports every declared input as an `INPUT_<NAME>`
//! environment variable with the name upper-cased, which is what the `env`
//! attributes below map to. Local runs can pass the same values as flags.

use std::path::Path;

use clap::Parser;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Parser, Debug, Clone)]
#[command(name = "pr-ticket-check")]
#[command(about = "Verifies that a pull request references a tracking ticket")]
pub struct ActionInputs {
    /// Token used to authenticate title updates and comments
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Pattern that extracts the ticket identifier from matched text
    #[arg(long, env = "INPUT_TICKETREGEX", default_value = r"[A-Z]{2,}-\d+")]
    pub ticket_regex: String,

    /// Value substituted for %prefix% in the title format
    #[arg(long, env = "INPUT_TICKETPREFIX", default_value = "")]
    pub ticket_prefix: String,

    /// Pattern a compliant title must match
    #[arg(long, env = "INPUT_TITLEREGEX", default_value = r"^\[?[A-Z]{2,}-\d+\]?")]
    pub title_regex: String,

    /// Flags applied to the title pattern (i, m, s, x, U)
    #[arg(long, env = "INPUT_TITLEREGEXFLAGS", default_value = "")]
    pub title_regex_flags: String,

    /// Pattern that detects a ticket reference in the branch name
    #[arg(long, env = "INPUT_BRANCHREGEX", default_value = r"[A-Z]{2,}-\d+")]
    pub branch_regex: String,

    /// Flags applied to the branch pattern
    #[arg(long, env = "INPUT_BRANCHREGEXFLAGS", default_value = "")]
    pub branch_regex_flags: String,

    /// Pattern that detects a ticket shorthand in the pull request body
    #[arg(long, env = "INPUT_BODYREGEX", default_value = r"[A-Z]{2,}-\d+")]
    pub body_regex: String,

    /// Flags applied to the body pattern
    #[arg(long, env = "INPUT_BODYREGEXFLAGS", default_value = "")]
    pub body_regex_flags: String,

    /// Template for rewritten titles; %prefix%, %id% and %title% are
    /// substituted
    #[arg(long, env = "INPUT_TITLEFORMAT", default_value = "[%id%] %title%")]
    pub title_format: String,

    /// Comma-separated logins exempt from enforcement
    #[arg(long, env = "INPUT_EXEMPTUSERS", default_value = "")]
    pub exempt_users: String,

    /// Pass "true" to suppress the explanatory comment when rewriting
    #[arg(long, env = "INPUT_QUIET", default_value = "")]
    pub quiet: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{pattern}` is not a valid pattern: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unsupported regex flag `{flag}` for pattern `{pattern}`")]
    UnsupportedFlag { flag: char, pattern: String },
}

/// Validated configuration with every pattern compiled up front. A pattern
/// that fails to compile aborts the run before any detection stage.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub title_pattern: Regex,
    pub branch_pattern: Regex,
    pub body_pattern: Regex,
    pub ticket_pattern: Regex,
    pub title_format: String,
    pub ticket_prefix: String,
    pub exempt_users: Vec<String>,
    pub quiet: bool,
}

impl ResolverConfig {
    pub fn from_inputs(inputs: &ActionInputs) -> Result<Self, ConfigError> {
        Ok(Self {
            title_pattern: compile_pattern(&inputs.title_regex, &inputs.title_regex_flags)?,
            branch_pattern: compile_pattern(&inputs.branch_regex, &inputs.branch_regex_flags)?,
            body_pattern: compile_pattern(&inputs.body_regex, &inputs.body_regex_flags)?,
            ticket_pattern: compile_pattern(&inputs.ticket_regex, "")?,
            title_format: inputs.title_format.clone(),
            ticket_prefix: inputs.ticket_prefix.clone(),
            exempt_users: split_exempt_users(&inputs.exempt_users),
            quiet: inputs.quiet.trim() == "true",
        })
    }
}

/// Compile a pattern with its paired flag string. Flag letters follow the
/// common scripting convention; `g` and `u` are accepted and ignored since
/// matching here is first-occurrence and patterns are always Unicode.
pub fn compile_pattern(pattern: &str, flags: &str) -> Result<Regex, ConfigError> {
    let mut builder = RegexBuilder::new(pattern);

    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            'g' | 'u' => &mut builder,
            other => {
                return Err(ConfigError::UnsupportedFlag {
                    flag: other,
                    pattern: pattern.to_string(),
                })
            }
        };
    }

    builder.build().map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn split_exempt_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(String::from)
        .collect()
}

/// Load .env file if it exists (local runs only; the runner injects the
/// real environment).
pub fn load_env_file() {
    if Path::new(".env").exists() && dotenvy::dotenv().is_ok() {
        tracing::info!("Loaded environment variables from .env file");
    }
}
