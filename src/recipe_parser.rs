use tracing::debug;

use crate::recipe::{Difficulty, Recipe};

pub const DEFAULT_TITLE: &str = "🍳 Рецепт от шеф-повара";
pub const DEFAULT_COOKING_TIME: u32 = 20;

const INGREDIENTS_KEYWORD: &str = "ингредиенты";
const INSTRUCTIONS_KEYWORD: &str = "приготовление";
const TIME_KEYWORD: &str = "время";
const TIME_QUALIFIER: &str = "приготовления";
const DIFFICULTY_KEYWORD: &str = "сложность";

const TITLE_BLOCKERS: &[&str] = &[INGREDIENTS_KEYWORD, INSTRUCTIONS_KEYWORD, TIME_KEYWORD, DIFFICULTY_KEYWORD];

const DEFAULT_INSTRUCTIONS: &[&str] = &[
    "1. Подготовьте все ингредиенты",
    "2. Следуйте общей логике приготовления",
    "3. Готовьте до готовности основных компонентов",
    "4. Добавьте специи по вкусу",
    "5. Подавайте горячим",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Ingredients,
    Instructions,
}

/// Turns free-form model output into a [`Recipe`]. Never fails: any field
/// that can't be recovered is replaced by a default built from
/// `original_selected`.
pub fn parse_recipe_text(raw: &str, original_selected: &[String]) -> Recipe {
    let mut title = String::new();
    let mut ingredients: Vec<String> = Vec::new();
    let mut instructions: Vec<String> = Vec::new();
    let mut cooking_time: Option<u32> = None;
    let mut difficulty: Option<Difficulty> = None;
    let mut section = Section::Preamble;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();

        if title.is_empty()
            && section == Section::Preamble
            && !TITLE_BLOCKERS.iter().any(|k| lower.contains(k))
        {
            title = clean_title(line);
            continue;
        }

        if lower.contains(INGREDIENTS_KEYWORD) {
            section = Section::Ingredients;
            continue;
        }
        if lower.contains(INSTRUCTIONS_KEYWORD) {
            section = Section::Instructions;
            continue;
        }
        if lower.contains(TIME_KEYWORD) && lower.contains(TIME_QUALIFIER) {
            if let Some(minutes) = first_positive_integer(line) {
                cooking_time = Some(minutes);
            }
            continue;
        }
        if lower.contains(DIFFICULTY_KEYWORD) {
            if let Some((_, value)) = line.split_once(':') {
                if let Some(parsed) = Difficulty::from_text(value) {
                    difficulty = Some(parsed);
                }
            }
            continue;
        }

        match section {
            Section::Ingredients => {
                if let Some(stripped) = strip_bullet(line) {
                    if !stripped.is_empty() {
                        ingredients.push(stripped.to_string());
                    }
                } else if !starts_with_digit(line) {
                    ingredients.push(line.to_string());
                }
            }
            Section::Instructions => {
                if starts_with_digit(line) && (line.contains('.') || line.contains(')') || line.contains(' ')) {
                    instructions.push(line.to_string());
                } else if !lower.contains(TIME_KEYWORD) {
                    instructions.push(line.to_string());
                }
            }
            Section::Preamble => {}
        }
    }

    if title.is_empty() {
        title = DEFAULT_TITLE.to_string();
    }
    if ingredients.is_empty() {
        ingredients = original_selected
            .iter()
            .map(|ing| format!("{} - по вкусу", ing))
            .chain(["Соль - по вкусу".to_string(), "Перец - по вкусу".to_string()])
            .collect();
    }
    if instructions.is_empty() {
        instructions = DEFAULT_INSTRUCTIONS.iter().map(|s| s.to_string()).collect();
    }

    debug!(
        title = %title,
        ingredients = ingredients.len(),
        steps = instructions.len(),
        time_found = cooking_time.is_some(),
        difficulty_found = difficulty.is_some(),
        "parsed generated recipe"
    );

    Recipe {
        title,
        ingredients,
        instructions,
        cooking_time: cooking_time.unwrap_or(DEFAULT_COOKING_TIME),
        difficulty: difficulty.unwrap_or_default(),
    }
}

/// `-`, `•` and markdown `* ` bullets. `**bold**` text is not a bullet.
fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .or_else(|| {
            line.strip_prefix('*')
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .map(str::trim)
}

fn starts_with_digit(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// First whitespace-separated token that is a plain positive integer.
fn first_positive_integer(line: &str) -> Option<u32> {
    line.split_whitespace()
        .filter(|word| word.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|word| word.parse::<u32>().ok())
        .find(|&minutes| minutes > 0)
}

/// Drops markdown emphasis and heading markers around a title line.
fn clean_title(line: &str) -> String {
    let cleaned = line.trim_matches(|c| c == '*' || c == '#' || c == '_').trim();
    if cleaned.is_empty() {
        line.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected() -> Vec<String> {
        vec!["яйца 3 шт".to_string(), "помидоры 2 шт".to_string()]
    }

    const WELL_FORMED: &str = "🍳 Омлет с помидорами

ИНГРЕДИЕНТЫ:
- Яйца - 3 шт
• Помидоры - 2 шт
Соль - по вкусу

ПРИГОТОВЛЕНИЕ:
1. Нарежьте помидоры
2) Взбейте яйца
Подавайте сразу

ВРЕМЯ ПРИГОТОВЛЕНИЯ: 15 минут
СЛОЖНОСТЬ: Легко";

    #[test]
    fn test_parse_well_formed_response() {
        let recipe = parse_recipe_text(WELL_FORMED, &selected());
        assert_eq!(recipe.title, "🍳 Омлет с помидорами");
        assert_eq!(recipe.ingredients, vec!["Яйца - 3 шт", "Помидоры - 2 шт", "Соль - по вкусу"]);
        assert_eq!(
            recipe.instructions,
            vec!["1. Нарежьте помидоры", "2) Взбейте яйца", "Подавайте сразу"]
        );
        assert_eq!(recipe.cooking_time, 15);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_parse_markdown_decorations() {
        let raw = "**Гречка с курицей**\n\n**Ингредиенты:**\n- гречка - 200г\n- курица - 300г\n\n**Приготовление:**\n1. Отварите гречку.\n2. Обжарьте курицу.\n\n**Время приготовления:** 35 минут\n**Сложность:** средне";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.title, "Гречка с курицей");
        assert_eq!(recipe.ingredients, vec!["гречка - 200г", "курица - 300г"]);
        assert_eq!(recipe.instructions.len(), 2);
        assert_eq!(recipe.cooking_time, 35);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_markdown_star_bullets_are_stripped() {
        let raw = "Салат\nИнгредиенты:\n* Лук - 1 шт\n*\tОгурец - 2 шт\n**Соль** - по вкусу\n*\n";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.ingredients, vec!["Лук - 1 шт", "Огурец - 2 шт", "**Соль** - по вкусу"]);
    }

    #[test]
    fn test_numbered_ingredient_lines_are_dropped() {
        let raw = "Салат\nИнгредиенты:\n1 помидор\nогурец\n";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.ingredients, vec!["огурец"]);
    }

    #[test]
    fn test_title_not_taken_after_a_section_starts() {
        let raw = "ИНГРЕДИЕНТЫ:\n- лук\nПРИГОТОВЛЕНИЕ:\n1. Нарежьте лук";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.ingredients, vec!["лук"]);
        assert_eq!(recipe.instructions, vec!["1. Нарежьте лук"]);
    }

    #[test]
    fn test_defaults_for_unstructured_text() {
        let recipe = parse_recipe_text("Просто пожарьте всё вместе.", &selected());
        assert_eq!(recipe.title, "Просто пожарьте всё вместе.");
        assert_eq!(
            recipe.ingredients,
            vec!["яйца 3 шт - по вкусу", "помидоры 2 шт - по вкусу", "Соль - по вкусу", "Перец - по вкусу"]
        );
        assert_eq!(recipe.instructions.len(), 5);
        assert_eq!(recipe.cooking_time, DEFAULT_COOKING_TIME);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_empty_and_garbage_input_is_total() {
        for raw in ["", "\n\n   \n", "\u{0}\u{fffd}\r\n::::", "сложность", "время приготовления: много"] {
            let recipe = parse_recipe_text(raw, &selected());
            assert!(!recipe.title.is_empty());
            assert!(!recipe.ingredients.is_empty());
            assert!(!recipe.instructions.is_empty());
            assert!(recipe.cooking_time > 0);
        }
    }

    #[test]
    fn test_time_and_difficulty_edge_cases() {
        let raw = "Суп\nВремя приготовления: 0 или 40 минут\nСложность: непонятно\nСложность без двоеточия";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.cooking_time, 40);
        assert_eq!(recipe.difficulty, Difficulty::Medium);

        let raw = "Суп\nСложность: сложно\nВремя приготовления: 20-25 минут";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.cooking_time, DEFAULT_COOKING_TIME);
        assert_eq!(recipe.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_bare_time_line_is_not_an_instruction() {
        let raw = "Суп\nПриготовление:\n1. Варите\nВремя: 30 минут";
        let recipe = parse_recipe_text(raw, &selected());
        assert_eq!(recipe.instructions, vec!["1. Варите"]);
    }
}
