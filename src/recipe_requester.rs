use std::time::Duration;
use tracing::{info, warn};

use crate::generation::GenerationService;
use crate::recipe::UserPreferences;

/// Seasonings the model may add on top of the selected ingredients.
pub const ALLOWED_ADDITIONS: &[&str] = &["соль", "перец", "растительное масло", "сахар", "вода"];

pub const RECIPE_SYSTEM_INSTRUCTION: &str = "Ты - профессиональный шеф-повар. Твоя задача - создавать рецепты ИСКЛЮЧИТЕЛЬНО из указанных пользователем ингредиентов.

СТРОГИЕ ПРАВИЛА:
1. Используй ТОЛЬКО те ингредиенты, которые указал пользователь
2. Можешь добавить только базовые специи: соль, перец, растительное масло, сахар, вода
3. НИКОГДА не добавляй дополнительные ингредиенты, которых нет у пользователя
4. Если ингредиентов недостаточно - предложи максимально простой вариант
5. Всегда отвечай на русском языке
6. Строго соблюдай указанный формат ответа";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            timeout: Duration::from_secs(60),
        }
    }
}

fn tags_or_none(tags: &[String]) -> String {
    if tags.is_empty() {
        "нет".to_string()
    } else {
        tags.join(", ")
    }
}

/// Builds the user prompt: the verbatim ingredient list, the allowed
/// additions, the prohibition on anything else, the user's profile and the
/// response layout the parser expects.
pub fn build_recipe_prompt(selected: &[String], preferences: &UserPreferences) -> String {
    let formatted_ingredients = selected
        .iter()
        .map(|ing| format!("- {}", ing))
        .collect::<Vec<_>>()
        .join("\n");
    let formatted_additions = ALLOWED_ADDITIONS
        .iter()
        .map(|add| format!("- {}", add))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "ЗАДАЧА: СОЗДАТЬ КУЛИНАРНЫЙ РЕЦЕПТ ИСКЛЮЧИТЕЛЬНО ИЗ УКАЗАННЫХ ИНГРЕДИЕНТОВ

ДОСТУПНЫЕ ИНГРЕДИЕНТЫ (ЭТО ВСЕ, ЧТО ЕСТЬ):
{ingredients}

РАЗРЕШЕННЫЕ ДОПОЛНЕНИЯ (только если нужны):
{additions}

ЗАПРЕЩЕНО:
- Добавлять любые другие ингредиенты, кроме указанных выше
- Предлагать продукты, которых нет в списке
- Использовать ингредиенты, которых у пользователя нет

ДОПОЛНИТЕЛЬНАЯ ИНФОРМАЦИЯ О ПОЛЬЗОВАТЕЛЕ:
- Уровень кулинарных навыков: {skill}
- Диетические предпочтения: {diet}
- Аллергии: {allergies}

ТРЕБОВАНИЯ К РЕЦЕПТУ:
1. Используй ТОЛЬКО доступные ингредиенты из списка выше
2. Учитывай уровень навыков пользователя и аллергии
3. Сделай рецепт практичным и выполнимым
4. Укажи точное время приготовления
5. Оцени сложность приготовления

ФОРМАТ ОТВЕТА (ОБЯЗАТЕЛЬНО СОБЛЮДАЙ!):

НАЗВАНИЕ РЕЦЕПТА (с эмодзи)

ИНГРЕДИЕНТЫ:
- ингредиент 1 - количество (только из списка выше)
- ингредиент 2 - количество (только из списка выше)
...

ПРИГОТОВЛЕНИЕ:
1. Шаг 1 приготовления
2. Шаг 2 приготовления
...

ВРЕМЯ ПРИГОТОВЛЕНИЯ: X минут
СЛОЖНОСТЬ: легко/средне/сложно

ПОВТОРЯЮ: НЕ ДОБАВЛЯЙ НИКАКИХ ДРУГИХ ИНГРЕДИЕНТОВ, КРОМЕ ТЕХ, ЧТО В СПИСКЕ!",
        ingredients = formatted_ingredients,
        additions = formatted_additions,
        skill = preferences.cooking_skill.label(),
        diet = tags_or_none(&preferences.dietary_preferences),
        allergies = tags_or_none(&preferences.allergies),
    )
}

/// Asks the generation service for recipe text. Unavailability, timeout and
/// empty output all come back as `None`; the text itself is not validated.
pub async fn request_recipe(
    service: &dyn GenerationService,
    selected: &[String],
    preferences: &UserPreferences,
    settings: &RequestSettings,
) -> Option<String> {
    if !service.is_available() {
        info!("generation service unavailable, skipping request");
        return None;
    }

    let prompt = build_recipe_prompt(selected, preferences);
    let call = service.generate(
        &prompt,
        RECIPE_SYSTEM_INSTRUCTION,
        settings.temperature,
        settings.max_tokens,
    );

    match tokio::time::timeout(settings.timeout, call).await {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            warn!("generation service returned no text");
            None
        }
        Err(_) => {
            warn!(timeout_ms = settings.timeout.as_millis() as u64, "generation request timed out");
            None
        }
    }
}
