//! Human-readable error descriptions and structured JSON error formatting.

use overload_core::{EngineError, StoreError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(e) = err.downcast_ref::<EngineError>() {
        return match e {
            EngineError::InvalidCommand { state, command } => {
                let hint = match state.as_str() {
                    "intro" => "Start a session first (e.g., `overload start <workout>`).".to_string(),
                    "workingSet" => "Log the set (`overload log --reps N --rating R`) or finish the exercise.".to_string(),
                    s if s.starts_with("rest") => "Use `overload advance` to end the rest, or `overload rest --adjust N`.".to_string(),
                    _ => "Run `overload status` to see the commands available now.".to_string(),
                };
                format!(
                    "What happened: `{command}` cannot be used while the session is in `{state}`.\nHow to fix: {hint}"
                )
            }
            EngineError::Contract(msg) => format!(
                "What happened: The request was rejected ({msg}).\nLikely causes: A value out of range, an unknown id, or a session already in progress.\nHow to fix: Check the arguments against `overload status` and the catalog."
            ),
            EngineError::Storage(msg) => format!(
                "What happened: Saving progress failed ({msg}); nothing was changed.\nLikely causes: The data directory is missing, read-only or full.\nHow to fix: Fix the data directory, then repeat the command (or `retry` in `overload session`)."
            ),
            EngineError::RetryRequired(cmd) => format!(
                "What happened: The save for `{cmd}` has not gone through yet.\nHow to fix: Use `retry` once storage is back, or `abandon` to discard the session."
            ),
            EngineError::Config(msg) => format!(
                "What happened: Invalid catalog ({msg}).\nLikely causes: An exercise, workout or plate set id that does not resolve.\nHow to fix: Edit the catalog TOML, then run `overload check`."
            ),
        };
    }

    if let Some(e) = err.downcast_ref::<StoreError>() {
        return format!(
            "What happened: The data directory could not be used ({e}).\nHow to fix: Check `storage.data_dir` / `--data-dir` and its permissions."
        );
    }

    // String-based heuristics for errors coming from catalog loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The catalog file could not be read.\nLikely causes: Wrong --config path.\nHow to fix: Pass --config <FILE> pointing at a catalog TOML. Original: {msg}"
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: The catalog is not valid TOML or misses a required field.\nHow to fix: Fix the reported line. Original: {msg}"
        );
    }

    if lower.contains("plate csv must have headers") {
        return "Invalid headers in plate CSV. Expected 'weight,count'.".to_string();
    }

    if lower.contains("must") || lower.contains("unknown") || lower.contains("duplicate") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nHow to fix: Edit the catalog TOML and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error class; anything untyped returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(e) = err.downcast_ref::<EngineError>() {
        return match e {
            EngineError::InvalidCommand { .. } => 3,
            EngineError::Contract(_) => 4,
            EngineError::Storage(_) => 5,
            EngineError::RetryRequired(_) => 6,
            EngineError::Config(_) => 7,
        };
    }
    if err.downcast_ref::<StoreError>().is_some() {
        return 5;
    }
    1
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::InvalidCommand { .. }) => "InvalidCommand",
        Some(EngineError::Contract(_)) => "Contract",
        Some(EngineError::Storage(_)) => "Storage",
        Some(EngineError::RetryRequired(_)) => "RetryRequired",
        Some(EngineError::Config(_)) => "Config",
        None if err.downcast_ref::<StoreError>().is_some() => "Storage",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    let reason = reason_name(err);
    let obj = match err.downcast_ref::<EngineError>() {
        Some(EngineError::InvalidCommand { state, command }) => json!({
            "reason": reason,
            "details": { "state": state, "command": command },
            "message": msg,
        }),
        Some(EngineError::RetryRequired(cmd)) => json!({
            "reason": reason,
            "details": { "pending": cmd },
            "message": msg,
        }),
        _ => json!({ "reason": reason, "message": msg }),
    };
    obj.to_string()
}
