use gpui::{App, Global, SharedString};
use serde_json::Value;
use std::collections::HashMap;

const EN: &str = include_str!("../i18n/en.json");

#[derive(Clone, Debug)]
pub struct I18n {
    messages: HashMap<String, String>,
}

impl I18n {
    pub fn t(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Look up `key` in the installed table, or in the bundled English one
    /// when `init` was never called.
    pub fn text(cx: &App, key: &str) -> SharedString {
        match cx.try_global::<I18n>() {
            Some(i18n) => i18n.t(key).into(),
            None => load_messages()
                .remove(key)
                .unwrap_or_else(|| key.to_string())
                .into(),
        }
    }
}

impl Global for I18n {}

fn load_messages() -> HashMap<String, String> {
    match serde_json::from_str::<Value>(EN) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect(),
        _ => HashMap::new(),
    }
}

pub fn init(cx: &mut App) {
    if cx.has_global::<I18n>() {
        return;
    }
    let messages = load_messages();
    tracing::debug!("Loaded {} strings", messages.len());
    cx.set_global(I18n { messages });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_strings() {
        let messages = load_messages();
        assert_eq!(
            messages.get("composer.placeholder").map(String::as_str),
            Some("Your message...")
        );
        assert_eq!(messages.get("badge.gif").map(String::as_str), Some("GIF"));
        assert_eq!(messages.get("badge.video").map(String::as_str), Some("VIDEO"));
    }

    #[test]
    fn test_missing_key_echoes() {
        let i18n = I18n {
            messages: load_messages(),
        };
        assert_eq!(i18n.t("no.such.key"), "no.such.key");
        assert_eq!(i18n.t("badge.gif"), "GIF");
    }
}
