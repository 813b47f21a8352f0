//! System instruction given to the model.

use std::path::Path;

use tracing::info;

/// Built-in instruction, used unless a prompt file is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an academic advisor helping a university student plan their \
semester schedule.

You can look up the student's curriculum (pensum) with their progress, \
read their current draft schedule, and add, remove or swap subject groups \
in that draft. Always check the draft schedule before changing it, and \
confirm what changed after every edit.

Only use group codes that appear in the curriculum or the schedule. If a \
tool returns an error, explain it to the student in plain words and \
suggest an alternative. Keep answers short and in the student's language.";

/// Read the instruction from `path`, or fall back to the built-in one.
pub fn load_system_prompt(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => {
            let prompt = std::fs::read_to_string(path)?;
            info!(path = %path.display(), "loaded system prompt");
            Ok(prompt.trim().to_string())
        }
        None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
    }
}
