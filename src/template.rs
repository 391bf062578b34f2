use tracing::debug;

use crate::pantry::category::{contains_any, PROTEIN_KEYWORDS, STARCH_KEYWORDS};
use crate::recipe::{Difficulty, Recipe};

pub const TEMPLATE_COOKING_TIME: u32 = 25;

const EGG_KEYWORDS: &[&str] = &["яйц", "омлет"];

const BASE_SEASONINGS: &[&str] = &["Соль - по вкусу", "Перец - по вкусу", "Растительное масло - 2 ст.л."];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishKind {
    Egg,
    MeatWithSide,
    MeatWithVegetables,
    Vegetable,
}

impl DishKind {
    /// Picks the dish by keyword presence: eggs first, then protein with or
    /// without a starch, otherwise a vegetable dish.
    pub fn detect(selected: &[String]) -> Self {
        let text = selected.join(" ").to_lowercase();
        if contains_any(&text, EGG_KEYWORDS) {
            DishKind::Egg
        } else if contains_any(&text, PROTEIN_KEYWORDS) {
            if contains_any(&text, STARCH_KEYWORDS) {
                DishKind::MeatWithSide
            } else {
                DishKind::MeatWithVegetables
            }
        } else {
            DishKind::Vegetable
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DishKind::Egg => "🍳 Омлет с выбранными ингредиентами",
            DishKind::MeatWithSide => "🍗 Мясо с гарниром",
            DishKind::MeatWithVegetables => "🍖 Мясное блюдо с овощами",
            DishKind::Vegetable => "🍲 Овощное блюдо",
        }
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            DishKind::Egg => &[
                "1. Подготовьте и нарежьте ингредиенты",
                "2. Взбейте яйца с солью",
                "3. Обжарьте основные компоненты",
                "4. Залейте яичной смесью",
                "5. Готовьте под крышкой на среднем огне 7-10 минут",
            ],
            DishKind::MeatWithSide => &[
                "1. Нарежьте мясо и обжарьте до готовности",
                "2. Приготовьте гарнир отдельно",
                "3. Подавайте мясо с гарниром",
            ],
            DishKind::MeatWithVegetables => &[
                "1. Нарежьте мясо и овощи",
                "2. Обжарьте мясо до золотистой корочки",
                "3. Добавьте овощи и тушите 15-20 минут",
                "4. Добавьте специи по вкусу",
            ],
            DishKind::Vegetable => &[
                "1. Подготовьте и нарежьте овощи",
                "2. Обжарьте на среднем огне до мягкости",
                "3. Добавьте специи по вкусу",
                "4. Тушите под крышкой 10-15 минут",
            ],
        }
    }
}

/// `"рис 150г"` becomes `"рис - 150г"`; an entry without a quantity gets `"по вкусу"`.
fn as_ingredient_line(entry: &str) -> String {
    let entry = entry.trim();
    match entry.split_once(char::is_whitespace) {
        Some((name, quantity)) if !quantity.trim().is_empty() => {
            format!("{} - {}", name, quantity.trim())
        }
        _ => format!("{} - по вкусу", entry),
    }
}

/// Deterministic recipe built from the selected entries alone.
pub fn synthesize_recipe(selected: &[String]) -> Recipe {
    let kind = DishKind::detect(selected);
    debug!(?kind, count = selected.len(), "synthesizing template recipe");

    let ingredients = selected
        .iter()
        .map(|entry| as_ingredient_line(entry))
        .chain(BASE_SEASONINGS.iter().map(|s| s.to_string()))
        .collect();

    Recipe {
        title: kind.title().to_string(),
        ingredients,
        instructions: kind.instructions().iter().map(|s| s.to_string()).collect(),
        cooking_time: TEMPLATE_COOKING_TIME,
        difficulty: Difficulty::Easy,
    }
}
