use std::borrow::Cow;

const MAX_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Markers after which a credential-like token follows.
const SECRET_MARKERS: &[&str] = &[
    "sk-",
    "Bearer ",
    "bearer ",
    "api_key=",
    "\"api_key\":\"",
    "access_token=",
    "\"access_token\":\"",
];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

/// Replace marker-plus-token runs with a placeholder.
pub fn scrub_secrets(input: &str) -> Cow<'_, str> {
    if !SECRET_MARKERS.iter().any(|m| input.contains(m)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in SECRET_MARKERS {
        let mut from = 0;
        while let Some(rel) = scrubbed[from..].find(marker) {
            let start = from + rel;
            let token_start = start + marker.len();
            let token_len: usize = scrubbed[token_start..]
                .chars()
                .take_while(|c| is_token_char(*c))
                .map(char::len_utf8)
                .sum();
            if token_len == 0 {
                from = token_start;
                continue;
            }
            scrubbed.replace_range(start..token_start + token_len, REDACTED);
            from = start + REDACTED.len();
        }
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets from an API error body and cap its length.
pub fn sanitize_api_error(body: &str) -> String {
    let scrubbed = scrub_secrets(body.trim());
    if scrubbed.chars().count() <= MAX_ERROR_CHARS {
        return scrubbed.into_owned();
    }
    let cut: String = scrubbed.chars().take(MAX_ERROR_CHARS).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(scrub_secrets("rate limited"), Cow::Borrowed(_)));
    }

    #[test]
    fn keys_and_bearer_tokens_are_redacted() {
        let body = r#"{"error":"Incorrect API key provided: sk-proj-abc123. Header was Bearer xyz.789"}"#;
        let scrubbed = scrub_secrets(body);
        assert!(!scrubbed.contains("abc123"));
        assert!(!scrubbed.contains("xyz.789"));
        assert_eq!(scrubbed.matches(REDACTED).count(), 2);
    }

    #[test]
    fn bare_marker_is_left_alone() {
        assert_eq!(scrub_secrets("use Bearer  auth"), "use Bearer  auth");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundaries() {
        let body = "é".repeat(500);
        let sanitized = sanitize_api_error(&body);
        assert!(sanitized.ends_with("..."));
        assert_eq!(sanitized.chars().count(), MAX_ERROR_CHARS + 3);
    }
}
