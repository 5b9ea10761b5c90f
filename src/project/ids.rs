// src/project/ids.rs

//! Task id rules: explicit ids are validated, implicit ids are derived from
//! the task title.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Result, TaskshiftError};

static TASK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid task id regex"));

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Check that `id` is usable as a task id (and as a TOML table key).
pub fn validate_task_id(id: &str) -> Result<()> {
    if TASK_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(TaskshiftError::Validation(format!(
            "invalid task id '{id}' (expected letters, digits, '_', '.' or '-', starting with a letter or digit)"
        )))
    }
}

/// Lowercase slug of a title, e.g. `"Write Docs!"` -> `"write-docs"`.
///
/// Falls back to `"task"` when the title has no usable characters.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "task".to_string()
    } else {
        slug.to_string()
    }
}

/// Derive an id from `title` that `taken` does not already contain.
///
/// The first candidate is the bare slug; then `-2`, `-3`, ...
pub fn unique_id_for(title: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = slugify(title);
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
