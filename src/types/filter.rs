//! Metadata filter specification

use serde::{Deserialize, Serialize};

/// Conjunction of optional metadata constraints. An absent field imposes no
/// constraint; present fields must match exactly and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Document owner name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Category name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Document year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    /// Document type label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

impl FilterSpec {
    /// True when no field is set (search is unrestricted)
    pub fn is_unconstrained(&self) -> bool {
        self.owner.is_none()
            && self.company.is_none()
            && self.category.is_none()
            && self.year.is_none()
            && self.doc_type.is_none()
    }

    /// Filter on owner only
    pub fn owner(name: impl Into<String>) -> Self {
        Self {
            owner: Some(name.into()),
            ..Default::default()
        }
    }

    /// Filter on company only
    pub fn company(name: impl Into<String>) -> Self {
        Self {
            company: Some(name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_detection() {
        assert!(FilterSpec::default().is_unconstrained());
        assert!(!FilterSpec::owner("Jane Doe").is_unconstrained());
        assert!(!FilterSpec {
            year: Some(2024),
            ..Default::default()
        }
        .is_unconstrained());
    }
}
