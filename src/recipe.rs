use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Maps free text (as written by the model) onto the closed set, `None` if nothing matches.
    pub fn from_text(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if ["легк", "несложн", "прост", "easy"].iter().any(|k| lower.contains(k)) {
            Some(Difficulty::Easy)
        } else if ["средн", "medium"].iter().any(|k| lower.contains(k)) {
            Some(Difficulty::Medium)
        } else if ["сложн", "трудн", "hard"].iter().any(|k| lower.contains(k)) {
            Some(Difficulty::Hard)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "легко",
            Difficulty::Medium => "средне",
            Difficulty::Hard => "сложно",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingSkill {
    #[default]
    Novice,
    Intermediate,
    Advanced,
}

impl CookingSkill {
    /// Unrecognised text falls back to `Novice`.
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "intermediate" | "любитель" | "средний" => CookingSkill::Intermediate,
            "advanced" | "опытный" | "профи" => CookingSkill::Advanced,
            _ => CookingSkill::Novice,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CookingSkill::Novice => "новичок",
            CookingSkill::Intermediate => "любитель",
            CookingSkill::Advanced => "опытный",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub cooking_skill: CookingSkill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: u64,
    pub recipe: Recipe,
}

pub const EMPTY_PANTRY_MESSAGE: &str =
    "😔 Ваш холодильник пуст. Добавьте продукты через меню '🥕 Мой холодильник'!";

pub const APOLOGY_MESSAGE: &str =
    "🍳 Извините, произошла ошибка при создании рецепта. Попробуйте снова.";

/// Renders a recipe as the chat-ready text block, with the saved id when there is one.
pub fn format_recipe(recipe: &Recipe, recipe_id: Option<u64>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "🍴 *{}*", recipe.title)?;
    writeln!(out)?;
    writeln!(out, "🥕 *Ингредиенты:*")?;
    for ingredient in &recipe.ingredients {
        writeln!(out, "• {}", ingredient)?;
    }
    writeln!(out)?;
    writeln!(out, "👨‍🍳 *Приготовление:*")?;
    for step in &recipe.instructions {
        writeln!(out, "{}", step)?;
    }
    writeln!(out)?;
    writeln!(out, "⏱ *Время:* {} мин", recipe.cooking_time)?;
    writeln!(out, "📊 *Сложность:* {}", recipe.difficulty)?;
    if let Some(id) = recipe_id {
        write!(out, "\n📝 Рецепт сохранен под номером #{}", id)?;
    }
    Ok(out)
}
