/// Default maximum prompt length, in characters.
pub const DEFAULT_MAX_PROMPT_LENGTH: usize = 1000;

/// Marker appended to a prompt that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Truncate `prompt` to at most `max_len` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
///
/// Lengths are counted in `char`s so the cut never lands inside a
/// multi-byte code point.
pub fn format_prompt(prompt: &str, max_len: usize) -> String {
    match prompt.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &prompt[..cut]),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
#[path = "prompt.test.rs"]
mod tests;
