//! Prompt and title validation plus optional style decoration.

use crate::error::CoreError;

/// Maximum accepted title length (characters, after trimming).
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum accepted prompt length (characters, after trimming).
pub const MAX_PROMPT_LEN: usize = 4000;

/// Title and prompt after validation, both trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPrompt {
    pub title: String,
    pub prompt: String,
}

/// Trim and validate a submission's title and prompt.
///
/// Both must be non-empty after trimming and within the length limits.
pub fn validate_submission(title: &str, prompt: &str) -> Result<ValidatedPrompt, CoreError> {
    let title = title.trim();
    let prompt = prompt.trim();

    if title.is_empty() || prompt.is_empty() {
        return Err(CoreError::Validation(
            "Prompt and title are required".into(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Err(CoreError::Validation(format!(
            "Prompt must be at most {MAX_PROMPT_LEN} characters"
        )));
    }

    Ok(ValidatedPrompt {
        title: title.to_string(),
        prompt: prompt.to_string(),
    })
}

/// Build the text sent to the generator.
///
/// Appends the user's preferred style when one is set; blank styles are
/// ignored. The stored prompt is never decorated.
pub fn compose_generation_prompt(prompt: &str, preferred_style: Option<&str>) -> String {
    match preferred_style.map(str::trim).filter(|s| !s.is_empty()) {
        Some(style) => format!("{prompt}. Style: {style}"),
        None => prompt.to_string(),
    }
}
