use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Protein,
    Vegetable,
    Starch,
    Dairy,
    Other,
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FoodCategory::Protein => "protein",
            FoodCategory::Vegetable => "vegetable",
            FoodCategory::Starch => "starch",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Other => "other",
        };
        f.write_str(name)
    }
}

pub const PROTEIN_KEYWORDS: &[&str] = &[
    "куриц", "курин", "филе", "мясо", "говядин", "свинин", "индейк", "фарш", "рыба", "яйц",
];

pub const VEGETABLE_KEYWORDS: &[&str] = &[
    "помидор", "огурец", "морковь", "лук", "перец", "баклажан", "кабачок", "картош", "капуст",
];

pub const STARCH_KEYWORDS: &[&str] = &["рис", "паста", "спагетти", "макарон", "греч", "пшено"];

pub const DAIRY_KEYWORDS: &[&str] = &["молоко", "сыр", "сметан", "творог", "йогурт", "кефир"];

/// Checked in order; the first table containing a matching stem decides the category.
const CATEGORY_TABLE: &[(FoodCategory, &[&str])] = &[
    (FoodCategory::Protein, PROTEIN_KEYWORDS),
    (FoodCategory::Vegetable, VEGETABLE_KEYWORDS),
    (FoodCategory::Starch, STARCH_KEYWORDS),
    (FoodCategory::Dairy, DAIRY_KEYWORDS),
];

/// The lowercased text before the first whitespace, or the whole entry if it has none.
pub fn leading_token(entry: &str) -> String {
    entry
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Maps a pantry entry such as `"помидоры 2 шт"` to its food category.
pub fn classify(entry: &str) -> FoodCategory {
    let token = leading_token(entry);
    if token.is_empty() {
        return FoodCategory::Other;
    }
    CATEGORY_TABLE
        .iter()
        .find(|(_, keywords)| contains_any(&token, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(FoodCategory::Other)
}

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
