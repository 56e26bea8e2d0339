use serde::{Deserialize, Serialize};

use crate::domain::{CweId, MisuseCaseId, UseCaseId};

/// Renders the misuse-case list for a set of CWE ids.
pub const MISUSE_CASES_ENDPOINT: &str = "misusecases/";
/// Renders the use cases of one misuse case.
pub const USE_CASES_ENDPOINT: &str = "usecases/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    /// `application/x-www-form-urlencoded`, arrays as repeated `key[]` pairs.
    #[default]
    Form,
    Json,
}

impl PayloadEncoding {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "form" => Some(Self::Form),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FragmentPayload {
    MisuseCases { cwe_ids: Vec<CweId> },
    UseCases { misuse_case_id: MisuseCaseId },
    ReportIssueForm { usecase_id: UseCaseId },
}

impl FragmentPayload {
    /// Form/query pairs in the order a browser would send them.
    ///
    /// An empty `cwe_ids` contributes no pairs at all.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::MisuseCases { cwe_ids } => cwe_ids
                .iter()
                .map(|id| ("cwe_ids[]".to_string(), id.0.clone()))
                .collect(),
            Self::UseCases { misuse_case_id } => {
                vec![("misuse_case_id".to_string(), misuse_case_id.0.clone())]
            }
            Self::ReportIssueForm { usecase_id } => {
                vec![("usecase_id".to_string(), usecase_id.0.clone())]
            }
        }
    }
}

/// One request for a server-rendered fragment. `url` is resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRequest {
    pub url: String,
    pub method: HttpMethod,
    pub payload: FragmentPayload,
}

impl FragmentRequest {
    pub fn misuse_cases(cwe_ids: Vec<CweId>) -> Self {
        Self {
            url: MISUSE_CASES_ENDPOINT.to_string(),
            method: HttpMethod::Post,
            payload: FragmentPayload::MisuseCases { cwe_ids },
        }
    }

    pub fn use_cases(misuse_case_id: MisuseCaseId, method: HttpMethod) -> Self {
        Self {
            url: USE_CASES_ENDPOINT.to_string(),
            method,
            payload: FragmentPayload::UseCases { misuse_case_id },
        }
    }

    pub fn report_issue_form(url: impl Into<String>, usecase_id: UseCaseId) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            payload: FragmentPayload::ReportIssueForm { usecase_id },
        }
    }
}

/// Server-rendered HTML that replaces a container's contents in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_filter_serializes_as_empty_array() {
        let payload = FragmentPayload::MisuseCases {
            cwe_ids: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&payload).expect("serialize"),
            json!({ "cwe_ids": [] })
        );
        assert!(payload.form_pairs().is_empty());
    }

    #[test]
    fn cwe_ids_become_repeated_bracket_pairs() {
        let payload = FragmentPayload::MisuseCases {
            cwe_ids: vec![CweId::from("79"), CweId::from("89")],
        };
        assert_eq!(
            payload.form_pairs(),
            vec![
                ("cwe_ids[]".to_string(), "79".to_string()),
                ("cwe_ids[]".to_string(), "89".to_string()),
            ]
        );
    }

    #[test]
    fn scalar_payloads_keep_their_field_names() {
        let detail = FragmentPayload::UseCases {
            misuse_case_id: MisuseCaseId::from("7"),
        };
        assert_eq!(
            serde_json::to_value(&detail).expect("serialize"),
            json!({ "misuse_case_id": "7" })
        );

        let report = FragmentPayload::ReportIssueForm {
            usecase_id: UseCaseId::from("12"),
        };
        assert_eq!(
            report.form_pairs(),
            vec![("usecase_id".to_string(), "12".to_string())]
        );
    }

    #[test]
    fn method_and_encoding_parse_case_insensitively() {
        assert_eq!(HttpMethod::parse(" GET "), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("put"), None);
        assert_eq!(PayloadEncoding::parse("Json"), Some(PayloadEncoding::Json));
    }
}
