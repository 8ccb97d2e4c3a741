//! Category assignment via an ordered rule table
//!
//! Rules are evaluated in table order and the first matching rule wins, so
//! overlapping patterns resolve by precedence. Products no rule matches get
//! the fallback category.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::models::{Category, ProductStats};

/// Built-in patterns in precedence order
///
/// Matched case-insensitively against the product name.
const GROCERY_PATTERNS: &[(Category, &str)] = &[
    (
        Category::DairyMilk,
        r"melk|milk|havermelk|amandel.*melk|soja.*melk|sojamelk|oatly|alpro|verse\s?melk|volle\s?melk|halfvolle\s?melk",
    ),
    (Category::Butter, r"boter|margarine|halvarine|becel|rama"),
    (
        Category::Bread,
        r"brood|bol(len)?|broodje|toast|croissant|baguette|ciabatta|pistolet|boterham",
    ),
    (
        Category::Cheese,
        r"kaas|cheese|gouda|emmentaler|mozzarella|parmezaan|parmesan|feta|camembert|brie|plak",
    ),
    (Category::Eggs, r"\bei(er|ren)\b|\begg(s)?\b|vrije\s?uitloop|scharrel"),
    (Category::Yogurt, r"yoghurt|yogurt|kwark|skyr|pudding|dessert"),
    (
        Category::CuredMeats,
        r"ham|salami|worst|vleeswaren|bacon|spek|mortadella|leverworst",
    ),
    (
        Category::Fruit,
        r"appel|banaan|sinaasappel|peer|druif|bessen|mango|ananas|kiwi|citroen|limoen|avocado|meloen",
    ),
    (
        Category::Vegetables,
        r"tomaat|komkommer|paprika|ui|wortel|sla|spinazie|broccoli|courgette|aardappel|champignon|prei",
    ),
    (
        Category::Meat,
        r"kip|kalf|rund|runder|varken|gehakt|filet|steak|schnitzel|goulash|shoarma",
    ),
    (
        Category::Beverages,
        r"water|sap|cola|limonade|fanta|sprite|bier|wijn|thee|koffie|energy|spa|frisdrank|sapjes",
    ),
    (
        Category::Confectionery,
        r"chocolade|koek|cookie|gummi|chips|snack|reep|ijs|bonbon|snoep",
    ),
    (
        Category::Frozen,
        r"diepvries|vries|pizza|patat|fri(et|t)en|vissticks|spinazie.*vries",
    ),
];

/// Anything that assigns exactly one category to a product
pub trait Classifier {
    fn classify(&self, product: &ProductStats) -> Category;
}

/// One (category, pattern) pair of a rule table
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pattern: Regex,
}

impl CategoryRule {
    /// Compile a case-insensitive rule; the fallback category is rejected
    pub fn new(category: Category, pattern: &str) -> Result<Self> {
        if category.is_fallback() {
            return Err(Error::InvalidData(format!(
                "Rules cannot target the fallback category: {}",
                pattern
            )));
        }
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { category, pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Ordered, first-match-wins rule table
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
}

impl RuleTable {
    /// Table from explicit rules, evaluated in the given order
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The built-in grocery table
    pub fn grocery() -> Result<Self> {
        let rules = GROCERY_PATTERNS
            .iter()
            .map(|(category, pattern)| CategoryRule::new(*category, pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Built-in table with extra rules evaluated ahead of it
    pub fn grocery_with_overrides(overrides: Vec<CategoryRule>) -> Result<Self> {
        let mut rules = overrides;
        rules.extend(Self::grocery()?.rules);
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// First rule matching `name`, if any
    pub fn matching_rule(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.matches(name))
    }

    /// Category for a product name; fallback when nothing matches
    pub fn classify_name(&self, name: &str) -> Category {
        self.matching_rule(name)
            .map(|rule| rule.category)
            .unwrap_or(Category::Other)
    }
}

impl Classifier for RuleTable {
    fn classify(&self, product: &ProductStats) -> Category {
        self.classify_name(&product.name)
    }
}
