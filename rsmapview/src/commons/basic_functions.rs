use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::collect::global_variables::{PLACEHOLDER, USER_AGENT};

/// Blocking HTTP client with the crate user agent and a per-request timeout
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).timeout(timeout).build()
}

/// Render a JSON scalar for display: strings without quotes, numbers as
/// upstream wrote them, null or missing as the placeholder
pub fn value_to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) if s.is_empty() => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// First `max` characters of a response body, for error messages
pub fn truncate_body(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(Some(&json!("Paris"))), "Paris");
        assert_eq!(value_to_text(Some(&json!(12.5))), "12.5");
        assert_eq!(value_to_text(Some(&json!(2133111))), "2133111");
        assert_eq!(value_to_text(Some(&Value::Null)), "-");
        assert_eq!(value_to_text(Some(&json!(""))), "-");
        assert_eq!(value_to_text(None), "-");
    }

    #[test]
    fn test_truncate_body_counts_chars() {
        assert_eq!(truncate_body("abcdef", 3), "abc");
        assert_eq!(truncate_body("éèà", 2), "éè");
        assert_eq!(truncate_body("ab", 200), "ab");
    }
}
