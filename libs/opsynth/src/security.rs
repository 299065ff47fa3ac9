//! Security schemes an operation can require.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::document::SecurityRequirement;

/// Closed set of security schemes understood by the builders.
///
/// `NoToken` is the sentinel for public operations: documents built with it carry
/// no `security` field at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Securities {
    #[default]
    AccessToken,
    RefreshToken,
    NoToken,
}

impl Securities {
    /// Every scheme that maps to a security-scheme component.
    pub const SCHEMES: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Key used in a `SecurityRequirement`, `None` for the sentinel.
    #[must_use]
    pub const fn scheme_name(self) -> Option<&'static str> {
        match self {
            Self::AccessToken => Some("access_token"),
            Self::RefreshToken => Some("refresh_token"),
            Self::NoToken => None,
        }
    }

    /// The `security` value for an operation using this scheme.
    #[must_use]
    pub fn requirements(self) -> Option<Vec<SecurityRequirement>> {
        self.scheme_name()
            .map(|name| vec![SecurityRequirement::new(name)])
    }

    /// `components.securitySchemes` entries for all non-sentinel schemes.
    #[must_use]
    pub fn security_schemes() -> BTreeMap<String, serde_json::Value> {
        Self::SCHEMES
            .iter()
            .filter_map(|s| s.scheme_name())
            .map(|name| {
                (
                    name.to_owned(),
                    serde_json::json!({
                        "type": "http",
                        "scheme": "bearer",
                        "bearerFormat": "JWT"
                    }),
                )
            })
            .collect()
    }
}
