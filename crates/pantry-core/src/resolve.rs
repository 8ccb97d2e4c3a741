//! Resolve a vague shopping intent to a concrete product preference
//!
//! "melk", "milk" and "halfvolle melk" all resolve to the dairy-milk
//! category. Category names and aliases are tried first; otherwise the
//! intent text itself is classified with the rule table.

use serde::Serialize;

use crate::categorize::RuleTable;
use crate::models::{Category, CategoryPreference, Preferences};

/// How the intent was mapped onto a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvedBy {
    /// The intent named the category
    Alias,
    /// A rule table pattern matched the intent
    Rule,
}

/// A resolved intent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution<'a> {
    pub category: Category,
    pub resolved_by: ResolvedBy,
    /// `None` when the history has no preference for the category
    pub preference: Option<&'a CategoryPreference>,
}

/// Map an intent to a category and its preference
///
/// Returns `None` when the intent maps to no category at all, including the
/// fallback category.
pub fn resolve_intent<'a>(
    preferences: &'a Preferences,
    rules: &RuleTable,
    intent: &str,
) -> Option<Resolution<'a>> {
    let intent = intent.trim();
    if intent.is_empty() {
        return None;
    }

    let (category, resolved_by) = match intent.parse::<Category>() {
        Ok(category) => (category, ResolvedBy::Alias),
        Err(_) => (rules.classify_name(intent), ResolvedBy::Rule),
    };

    if category.is_fallback() {
        return None;
    }

    Some(Resolution {
        category,
        resolved_by,
        preference: preferences.get(&category),
    })
}
