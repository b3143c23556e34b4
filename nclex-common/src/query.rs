//! Filter state and list query building
//!
//! The list view exposes four user-facing filters. Any filter left at `"all"`
//! (or empty) places no constraint on the request and is omitted from the
//! query entirely, leaving defaulting to the server.

use serde::{Deserialize, Serialize};

/// Filter value meaning "no constraint"
pub const ALL: &str = "all";

/// User-chosen constraints narrowing the list view
///
/// Equality is by value over all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Free-text search over title, author and content
    pub search: String,
    /// `"all"`, `"yes"` or `"no"`
    pub is_working: String,
    /// `"all"`, `"High"`, `"Medium"` or `"Low"`
    pub english_level: String,
    /// `"all"` or a resource name
    pub resource: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            is_working: ALL.to_string(),
            english_level: ALL.to_string(),
            resource: ALL.to_string(),
        }
    }
}

impl FilterState {
    /// Restore the unconstrained state regardless of current values
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no filter constrains the list
    pub fn is_unconstrained(&self) -> bool {
        self.build_query() == ReviewQuery::default()
    }

    /// Build the list query, populating only constrained fields
    pub fn build_query(&self) -> ReviewQuery {
        ReviewQuery {
            search: constraint(&self.search),
            is_working: constraint(&self.is_working),
            english_level: constraint(&self.english_level),
            resource: constraint(&self.resource),
            page: None,
        }
    }
}

/// Canonical list request
///
/// Serializes directly to the `GET /reviews` query string; `None` fields are
/// left out rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_working: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ReviewQuery {
    /// Request a specific page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Recover the filter state this query expresses
    pub fn to_filter_state(&self) -> FilterState {
        let or_all = |v: &Option<String>| v.clone().unwrap_or_else(|| ALL.to_string());
        FilterState {
            search: self.search.clone().unwrap_or_default(),
            is_working: or_all(&self.is_working),
            english_level: or_all(&self.english_level),
            resource: or_all(&self.resource),
        }
    }

    /// Rebuild the query from its own filter state
    ///
    /// Idempotent apart from `page`, which is not part of the filter state and
    /// is carried over unchanged.
    pub fn rebuild(&self) -> ReviewQuery {
        ReviewQuery {
            page: self.page,
            ..self.to_filter_state().build_query()
        }
    }

    /// Query parameters in wire order, constrained fields only
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        let fields = [
            ("search", &self.search),
            ("is_working", &self.is_working),
            ("english_level", &self.english_level),
            ("resource", &self.resource),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                pairs.push((name, value.clone()));
            }
        }
        pairs
    }
}

fn constraint(value: &str) -> Option<String> {
    if value.is_empty() || value == ALL {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn filters(search: &str, working: &str, level: &str, resource: &str) -> FilterState {
        FilterState {
            search: search.to_string(),
            is_working: working.to_string(),
            english_level: level.to_string(),
            resource: resource.to_string(),
        }
    }

    #[test]
    fn test_default_builds_empty_query() {
        let query = FilterState::default().build_query();
        assert_eq!(query, ReviewQuery::default());
        assert!(query.to_pairs().is_empty());
    }

    #[test]
    fn test_only_constrained_fields_populated() {
        let query = filters("uworld", "yes", "all", "").build_query();
        assert_eq!(query.search.as_deref(), Some("uworld"));
        assert_eq!(query.is_working.as_deref(), Some("yes"));
        assert_eq!(query.english_level, None);
        assert_eq!(query.resource, None);
    }

    #[test]
    fn test_all_and_empty_omitted_for_every_field() {
        for value in ["", ALL] {
            let query = filters(value, value, value, value).build_query();
            assert_eq!(query, ReviewQuery::default());
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let states = [
            FilterState::default(),
            filters("night shift", "no", "Low", "Archer"),
            filters("", "yes", "all", "Mark Klimek"),
            filters("x", "all", "High", "all"),
        ];
        for state in states {
            let query = state.build_query();
            assert_eq!(query.rebuild(), query);
            assert_eq!(query.rebuild().rebuild(), query);
            assert_eq!(query.to_filter_state().build_query(), query);
        }
    }

    #[test]
    fn test_rebuild_keeps_page() {
        let query = filters("a", "all", "all", "all").build_query().with_page(3);
        assert_eq!(query.rebuild().page, Some(3));
    }

    #[test]
    fn test_equality_is_by_value() {
        let a = filters("s", "yes", "High", "Kaplan");
        let b = FilterState {
            resource: "Kaplan".to_string(),
            english_level: "High".to_string(),
            search: "s".to_string(),
            is_working: "yes".to_string(),
        };
        assert_eq!(a, b);

        let set: HashSet<FilterState> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(a, FilterState::default());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut state = filters("abc", "no", "Low", "UWorld");
        state.reset();
        assert_eq!(state, filters("", "all", "all", "all"));
        assert!(state.is_unconstrained());
    }

    #[test]
    fn test_pairs_order() {
        let query = filters("q", "yes", "High", "Kaplan").build_query().with_page(2);
        let names: Vec<_> = query.to_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["page", "search", "is_working", "english_level", "resource"]);
    }
}
