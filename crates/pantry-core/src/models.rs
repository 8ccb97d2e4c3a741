//! Domain models for Pantry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One observed purchase of one product in one delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Stable external product identifier
    pub product_id: String,
    pub name: String,
    /// 0 means the price is unknown
    pub price_cents: u32,
    /// Free text such as "1L" or "6 stuks"
    pub unit_label: String,
    /// Always at least 1
    pub quantity: u32,
    /// Delivery window start or delivery creation time
    pub occurred_at: String,
}

/// Aggregated view of one distinct product id
///
/// `name`, `unit_label` and `price_cents` come from the first record seen
/// for the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub product_id: String,
    pub name: String,
    pub unit_label: String,
    pub price_cents: u32,
    /// Number of purchase records with this id
    pub occurrence_count: u32,
    /// Sum of the records' quantities
    pub total_quantity: u32,
}

/// Grocery category assigned to a product
///
/// Declaration order is significant: it is the precedence order of the
/// built-in rule table and the ordering of category-keyed maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    DairyMilk,
    Butter,
    Bread,
    Cheese,
    Eggs,
    Yogurt,
    CuredMeats,
    Fruit,
    Vegetables,
    Meat,
    Beverages,
    Confectionery,
    Frozen,
    /// Fallback for products no rule matches
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DairyMilk => "dairy-milk",
            Self::Butter => "butter",
            Self::Bread => "bread",
            Self::Cheese => "cheese",
            Self::Eggs => "eggs",
            Self::Yogurt => "yogurt",
            Self::CuredMeats => "cured-meats",
            Self::Fruit => "fruit",
            Self::Vegetables => "vegetables",
            Self::Meat => "meat",
            Self::Beverages => "beverages",
            Self::Confectionery => "confectionery",
            Self::Frozen => "frozen",
            Self::Other => "other",
        }
    }

    /// Every category, fallback last
    pub fn all() -> &'static [Category] {
        &[
            Self::DairyMilk,
            Self::Butter,
            Self::Bread,
            Self::Cheese,
            Self::Eggs,
            Self::Yogurt,
            Self::CuredMeats,
            Self::Fruit,
            Self::Vegetables,
            Self::Meat,
            Self::Beverages,
            Self::Confectionery,
            Self::Frozen,
            Self::Other,
        ]
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Other)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::DairyMilk => "🥛",
            Self::Butter => "🧈",
            Self::Bread => "🍞",
            Self::Cheese => "🧀",
            Self::Eggs => "🥚",
            Self::Yogurt => "🥄",
            Self::CuredMeats => "🥓",
            Self::Fruit => "🍎",
            Self::Vegetables => "🥕",
            Self::Meat => "🍖",
            Self::Beverages => "🥤",
            Self::Confectionery => "🍫",
            Self::Frozen => "🧊",
            Self::Other => "📦",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Accepts the tag, the English word and the Dutch word
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dairy-milk" | "milk" | "melk" => Ok(Self::DairyMilk),
            "butter" | "boter" => Ok(Self::Butter),
            "bread" | "brood" => Ok(Self::Bread),
            "cheese" | "kaas" => Ok(Self::Cheese),
            "eggs" | "egg" | "eieren" | "ei" => Ok(Self::Eggs),
            "yogurt" | "yoghurt" | "dessert" => Ok(Self::Yogurt),
            "cured-meats" | "cold-cuts" | "vleeswaren" => Ok(Self::CuredMeats),
            "fruit" => Ok(Self::Fruit),
            "vegetables" | "vegetable" | "groente" => Ok(Self::Vegetables),
            "meat" | "vlees" => Ok(Self::Meat),
            "beverages" | "drinks" | "drank" => Ok(Self::Beverages),
            "confectionery" | "sweets" | "snoep" => Ok(Self::Confectionery),
            "frozen" | "diepvries" => Ok(Self::Frozen),
            "other" | "overig" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inferred default product and bounded alternatives for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub default: ProductStats,
    /// Rank-ordered, at most [`crate::preferences::MAX_ALTERNATIVES`] entries,
    /// never containing `default`
    pub alternatives: Vec<ProductStats>,
}

/// Category → preference mapping, one entry per non-fallback category with members
pub type Preferences = BTreeMap<Category, CategoryPreference>;
