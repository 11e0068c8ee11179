//! Project field validation and the activation toggle rule.

use crate::error::CoreError;
use crate::flag::{YesNo, FLAG_NO};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a project title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a task description or sub-task line in characters.
pub const MAX_TASK_TEXT_LENGTH: usize = 500;

/// Activation flag given to a freshly created project.
pub const DEFAULT_ACTIVE: YesNo = YesNo::No;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a project title: must be non-blank and within the length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project title cannot be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a task description: must be non-blank and within the length limit.
pub fn validate_task_text(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Task description cannot be empty".to_string(),
        ));
    }
    validate_sub_task_text(description)
}

/// Validate a sub-task line. Blank lines are allowed; only length is checked.
pub fn validate_sub_task_text(content: &str) -> Result<(), CoreError> {
    if content.chars().count() > MAX_TASK_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Task text exceeds maximum length of {MAX_TASK_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Compute the flag an activation toggle writes, given the stored value.
///
/// Keyed off the literal `"N"`: `"N"` becomes `"Y"`, and every other stored
/// value (including `"Y"` and anything unexpected) becomes `"N"`.
pub fn next_active_flag(current: &str) -> YesNo {
    if current == FLAG_NO {
        YesNo::Yes
    } else {
        YesNo::No
    }
}
