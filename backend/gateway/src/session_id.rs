//! Session identifier extraction.
//!
//! The NLU front end names its contexts
//! `projects/<p>/agent/sessions/<id>/contexts/<ctx>`; the conversation key
//! is the `<id>` segment.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static SESSION_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/sessions/(.*?)/contexts/").unwrap());

/// Extract the session id from a context name, or `None` when the name
/// does not follow the documented shape. Never fails the request; the
/// caller treats the session as unidentifiable.
pub fn extract_session_id(context_name: &str) -> Option<String> {
    match SESSION_ID_PATTERN.captures(context_name) {
        Some(caps) => Some(caps[1].to_string()),
        None => {
            warn!(context_name, "No session id found in context name");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_session_segment() {
        let name = "projects/food-bot/agent/sessions/abc-123/contexts/ongoing-order";
        assert_eq!(extract_session_id(name).as_deref(), Some("abc-123"));
    }

    #[test]
    fn takes_the_shortest_match_up_to_contexts() {
        let name = "/sessions/one/contexts/x/sessions/two/contexts/y";
        assert_eq!(extract_session_id(name).as_deref(), Some("one"));
    }

    #[test]
    fn nonconforming_names_yield_none() {
        assert_eq!(extract_session_id("projects/food-bot/agent"), None);
        assert_eq!(extract_session_id("/sessions/abc-123"), None);
        assert_eq!(extract_session_id(""), None);
    }
}
