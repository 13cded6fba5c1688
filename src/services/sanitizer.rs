use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

pub const MAX_INPUT_CHARS: usize = 2000;

fn script_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script\s*>").unwrap())
}

fn event_handler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)on\w+\s*=").unwrap())
}

fn shell_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[;&|`$()]").unwrap())
}

fn markup_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[<>=]").unwrap())
}

/// Characters considered before stripping starts; bounds the work per request.
pub const MAX_SCAN_CHARS: usize = MAX_INPUT_CHARS * 4;
pub const MAX_STRIP_PASSES: usize = 8;

/// Strips markup/script and shell metacharacters from user text, then bounds it.
///
/// Removal is repeated so fragments that only form a forbidden pattern once
/// something between them is removed are caught too. If the text is still
/// changing after `MAX_STRIP_PASSES`, every `<`, `>` and `=` is dropped instead.
pub fn sanitize(raw: &str) -> String {
    let mut clean: String = raw.chars().take(MAX_SCAN_CHARS).collect();
    let mut stable = false;
    for _ in 0..MAX_STRIP_PASSES {
        let next = strip_once(&clean);
        if next == clean {
            stable = true;
            break;
        }
        clean = next;
    }
    if !stable {
        clean = markup_chars_re().replace_all(&strip_once(&clean), "").into_owned();
    }

    let truncated: String = clean.chars().take(MAX_INPUT_CHARS).collect();
    truncated.trim().to_string()
}

/// Anything that isn't a JSON string sanitizes to nothing.
pub fn sanitize_value(raw: &Value) -> String {
    match raw {
        Value::String(text) => sanitize(text),
        _ => String::new(),
    }
}

fn strip_once(text: &str) -> String {
    let clean = script_block_re().replace_all(text, "");
    let clean = event_handler_re().replace_all(&clean, "");
    shell_chars_re().replace_all(&clean, "").into_owned()
}
