use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(CweId);
id_newtype!(MisuseCaseId);
id_newtype!(UseCaseId);

/// CWE identifiers picked in the category multi-select. Empty matches every misuse case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<CweId>);

impl FilterSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A multi-select with nothing picked reports `None`; that reads as "match all".
    pub fn from_selection(selection: Option<Vec<CweId>>) -> Self {
        Self(selection.unwrap_or_default())
    }

    pub fn ids(&self) -> &[CweId] {
        &self.0
    }

    pub fn into_ids(self) -> Vec<CweId> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CweId> for FilterSet {
    fn from_iter<I: IntoIterator<Item = CweId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
