use std::{collections::HashMap, fs};

use catalog_client::{ControllerOptions, MarkupVariant};
use shared::protocol::{HttpMethod, PayloadEncoding};
use tracing::warn;

pub const SETTINGS_FILE: &str = "browser.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub page_url: String,
    pub markup_variant: MarkupVariant,
    pub detail_method: HttpMethod,
    pub payload_encoding: PayloadEncoding,
    pub reselect_guard: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_url: "http://127.0.0.1:8000/app/muo/misusecase/".into(),
            markup_variant: MarkupVariant::Current,
            detail_method: HttpMethod::Post,
            payload_encoding: PayloadEncoding::Form,
            reselect_guard: true,
        }
    }
}

impl Settings {
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            markup: self.markup_variant,
            detail_method: self.detail_method,
            reselect_guard: self.reselect_guard,
        }
    }

    pub fn use_legacy_pages(&mut self) {
        let legacy = ControllerOptions::legacy();
        self.markup_variant = legacy.markup;
        self.detail_method = legacy.detail_method;
        self.reselect_guard = legacy.reselect_guard;
    }

    /// Applies one named setting. Unknown keys and unparsable values are logged and skipped.
    fn set(&mut self, key: &str, value: &str) {
        let applied = match key {
            "page_url" => {
                self.page_url = value.to_string();
                true
            }
            "markup_variant" => assign(&mut self.markup_variant, MarkupVariant::parse(value)),
            "detail_method" => assign(&mut self.detail_method, HttpMethod::parse(value)),
            "payload_encoding" => {
                assign(&mut self.payload_encoding, PayloadEncoding::parse(value))
            }
            "reselect_guard" => assign(&mut self.reselect_guard, parse_flag(value)),
            _ => {
                warn!(key, "ignoring unknown browser setting");
                return;
            }
        };
        if !applied {
            warn!(key, value, "ignoring invalid browser setting");
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_config(&mut settings, &file_cfg),
            Err(err) => {
                warn!(file = SETTINGS_FILE, error = %err, "ignoring unreadable settings file")
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings.page_url = normalize_page_url(&settings.page_url);
    settings
}

fn apply_file_config(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    let mut keys: Vec<_> = file_cfg.keys().collect();
    keys.sort();
    for key in keys {
        let value = match &file_cfg[key] {
            toml::Value::String(value) => value.clone(),
            other => other.to_string(),
        };
        settings.set(key, &value);
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CATALOG_PAGE_URL") {
        settings.page_url = v;
    }
    if let Some(v) = lookup("APP__PAGE_URL") {
        settings.page_url = v;
    }

    for (var, key) in [
        ("APP__MARKUP_VARIANT", "markup_variant"),
        ("APP__DETAIL_METHOD", "detail_method"),
        ("APP__PAYLOAD_ENCODING", "payload_encoding"),
        ("APP__RESELECT_GUARD", "reselect_guard"),
    ] {
        if let Some(v) = lookup(var) {
            settings.set(key, &v);
        }
    }
}

/// Relative endpoints resolve beneath the page, so the page URL must end in a slash.
pub fn normalize_page_url(raw_page_url: &str) -> String {
    let raw_page_url = raw_page_url.trim();

    if raw_page_url.is_empty() {
        return Settings::default().page_url;
    }

    if raw_page_url.ends_with('/') {
        return raw_page_url.to_string();
    }

    format!("{raw_page_url}/")
}

fn assign<T>(slot: &mut T, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
