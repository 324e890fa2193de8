use std::collections::BTreeMap;

use super::domain::Candidature;
use crate::http::QueryParams;

/// Free-text search across the serialized record.
pub const SEARCH_KEY: &str = "q";
/// Substring search across competences.
pub const SKILL_KEY: &str = "skill";
/// `field:direction`; only `field` reaches the server.
pub const SORT_KEY: &str = "sort";
/// Query parameter carrying the sort field.
pub const SORT_PARAM: &str = "_sort";

/// Caller-supplied filters, keyed by parameter name. Forwarded keys reach the server
/// in sorted order.
pub type FilterMap = BTreeMap<String, String>;

/// Filters split into what is sent to the server and what is applied locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPlan {
    pub query: QueryParams,
    /// Lowercased free-text needle.
    pub text: Option<String>,
    /// Lowercased competence needle.
    pub skill: Option<String>,
}

impl FilterPlan {
    pub fn from_filters(filters: &FilterMap) -> Self {
        let mut plan = Self::default();

        for (key, value) in filters {
            match key.as_str() {
                SEARCH_KEY => plan.text = local_needle(value),
                SKILL_KEY => plan.skill = local_needle(value),
                SORT_KEY => {
                    if let Some(field) = sort_field(value) {
                        plan.query
                            .insert(SORT_PARAM.to_string(), Some(field.to_string()));
                    }
                }
                _ => {
                    plan.query.insert(key.clone(), Some(value.clone()));
                }
            }
        }

        plan
    }

    pub fn matches(&self, candidature: &Candidature) -> bool {
        let text_matches = self
            .text
            .as_deref()
            .map_or(true, |needle| candidature.search_text().contains(needle));
        let skill_matches = self
            .skill
            .as_deref()
            .map_or(true, |needle| candidature.has_competence_containing(needle));
        text_matches && skill_matches
    }

    /// Keeps matching records in their original order.
    pub fn apply(&self, records: Vec<Candidature>) -> Vec<Candidature> {
        if self.text.is_none() && self.skill.is_none() {
            return records;
        }
        records
            .into_iter()
            .filter(|candidature| self.matches(candidature))
            .collect()
    }
}

fn local_needle(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

fn sort_field(value: &str) -> Option<&str> {
    value.split(':').next().filter(|field| !field.is_empty())
}
