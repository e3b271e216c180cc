use serde::Serialize;
use serde_json::Value;

/// An ordered list of `key=value` pairs for Stripe's `application/x-www-form-urlencoded` request bodies.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<K: Into<String>, V: AsRef<str>>(&mut self, key: K, value: V) -> &mut Self {
        self.0.push((key.into(), value.as_ref().to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extracts the human-readable message from a Stripe error body (`{"error": {"message": ...}}`), falling back to the
/// raw body.
pub fn stripe_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}
