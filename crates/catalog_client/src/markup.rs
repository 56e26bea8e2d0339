//! Selector contracts with the server-rendered markup and entry extraction from list fragments.

use std::sync::LazyLock;

use regex::Regex;
use shared::{
    domain::{MisuseCaseId, UseCaseId},
    protocol::Fragment,
};

use crate::surface::Container;

pub const SELECTED_CLASS: &str = "selected";
pub const REFRESH_BUTTON_SELECTOR: &str = "#refresh_button";
pub const CWE_SELECT_SELECTOR: &str = "#id_cwes";
pub const MODAL_ROOT_SELECTOR: &str = "#muo-modal";
pub const USECASE_ID_ATTRIBUTE: &str = "data-usecase-id";
pub const AJAX_URL_ATTRIBUTE: &str = "data-ajax-url";

static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[A-Za-z][A-Za-z0-9-]*((?:[^<>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("start tag pattern is valid")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern is valid")
});

/// Which generation of the catalog templates the page was rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupVariant {
    /// Kebab-case classes, entries keyed by `data-value`.
    #[default]
    Current,
    /// CamelCase classes, entries keyed by their `id` attribute.
    Legacy,
}

impl MarkupVariant {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "current" => Some(Self::Current),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub fn entry_class(self) -> &'static str {
        match self {
            Self::Current => "misuse-case-container",
            Self::Legacy => "misuseCaseContainer",
        }
    }

    pub fn entry_id_attribute(self) -> &'static str {
        match self {
            Self::Current => "data-value",
            Self::Legacy => "id",
        }
    }

    pub fn container_selector(self, container: Container) -> &'static str {
        match (self, container) {
            (Self::Current, Container::ItemList) => ".slim-scroll-div",
            (Self::Legacy, Container::ItemList) => ".slimScrollDiv",
            (Self::Current, Container::Detail) => ".fat-scroll-div",
            (Self::Legacy, Container::Detail) => ".fatScrollDiv",
            (_, Container::Modal) => "#muo-modal .modal-content",
        }
    }
}

/// Ids of the list entries in `fragment`, in document order.
///
/// An entry is a start tag whose `class` list holds the variant's entry class. Tags inside
/// comments do not count, and entries without a usable id are skipped.
pub fn parse_entries(fragment: &Fragment, variant: MarkupVariant) -> Vec<MisuseCaseId> {
    let markup = COMMENT.replace_all(fragment.as_str(), "");
    START_TAG
        .captures_iter(&markup)
        .filter_map(|tag| {
            let attributes = parse_attributes(tag.get(1).map_or("", |m| m.as_str()));
            if !has_class(&attributes, variant.entry_class()) {
                return None;
            }
            attribute(&attributes, variant.entry_id_attribute())
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(MisuseCaseId::new)
        })
        .collect()
}

/// The element that opened the report-issue modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTrigger {
    pub usecase_id: UseCaseId,
    pub ajax_url: String,
}

impl ModalTrigger {
    pub fn new(usecase_id: UseCaseId, ajax_url: impl Into<String>) -> Self {
        Self {
            usecase_id,
            ajax_url: ajax_url.into(),
        }
    }

    /// Reads the trigger attributes off the first start tag in `markup`.
    pub fn from_markup(markup: &str) -> Option<Self> {
        let markup = COMMENT.replace_all(markup, "");
        let tag = START_TAG.captures(&markup)?;
        let attributes = parse_attributes(tag.get(1).map_or("", |m| m.as_str()));
        let usecase_id = attribute(&attributes, USECASE_ID_ATTRIBUTE)?.trim();
        let ajax_url = attribute(&attributes, AJAX_URL_ATTRIBUTE)?.trim();
        if usecase_id.is_empty() || ajax_url.is_empty() {
            return None;
        }
        Some(Self::new(UseCaseId::new(usecase_id), ajax_url))
    }
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str().to_ascii_lowercase();
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map_or("", |m| m.as_str());
            Some((name, decode_entities(value)))
        })
        .collect()
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    // `&amp;` goes last so an escaped entity such as `&amp;lt;` decodes only once.
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn has_class(attributes: &[(String, String)], class: &str) -> bool {
    attribute(attributes, "class")
        .is_some_and(|classes| classes.split_ascii_whitespace().any(|token| token == class))
}

#[cfg(test)]
#[path = "tests/markup_tests.rs"]
mod tests;
