use anyhow::Result;
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::generation::GenerationService;
use crate::pantry::select_ingredients;
use crate::recipe::{format_recipe, Recipe, UserPreferences, APOLOGY_MESSAGE, EMPTY_PANTRY_MESSAGE};
use crate::recipe_parser::parse_recipe_text;
use crate::recipe_requester::{request_recipe, RequestSettings};
use crate::store::{PantryStore, PreferencesStore, RecipeStore, UserId};
use crate::template::synthesize_recipe;

/// Which path produced a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSource {
    Generated,
    Template,
    /// Nothing in the pantry was classifiable; the template ran over the whole pantry.
    PantryTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOutcome {
    pub recipe: Recipe,
    pub source: RecipeSource,
    pub selected: Vec<String>,
}

/// Runs one recipe request: pantry, preferences, selection, generation or
/// template fallback, persistence and formatting. Holds no per-request state.
pub struct ChefAgent {
    pantry: Arc<dyn PantryStore>,
    preferences: Arc<dyn PreferencesStore>,
    recipes: Arc<dyn RecipeStore>,
    generator: Arc<dyn GenerationService>,
    settings: RequestSettings,
    rng_seed: Option<u64>,
}

impl ChefAgent {
    pub fn new(
        pantry: Arc<dyn PantryStore>,
        preferences: Arc<dyn PreferencesStore>,
        recipes: Arc<dyn RecipeStore>,
        generator: Arc<dyn GenerationService>,
    ) -> Self {
        Self {
            pantry,
            preferences,
            recipes,
            generator,
            settings: RequestSettings::default(),
            rng_seed: None,
        }
    }

    pub fn with_settings(mut self, settings: RequestSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Makes ingredient selection reproducible; every request reuses the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn new_rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Pantry contents; a failed read counts as an empty pantry.
    pub async fn analyze_fridge(&self, user_id: UserId) -> Vec<String> {
        match self.pantry.list_items(user_id).await {
            Ok(items) => items,
            Err(e) => {
                warn!(user_id, error = %e, "pantry read failed, treating as empty");
                Vec::new()
            }
        }
    }

    pub async fn user_preferences(&self, user_id: UserId) -> UserPreferences {
        match self.preferences.get_preferences(user_id).await {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(user_id, error = %e, "preferences read failed, using defaults");
                UserPreferences::default()
            }
        }
    }

    pub async fn create_recipe(&self, pantry: &[String], preferences: &UserPreferences) -> RecipeOutcome {
        let selected = {
            let mut rng = self.new_rng();
            select_ingredients(pantry, &mut rng)
        };
        info!(count = selected.len(), ?selected, "ingredients selected");

        if selected.is_empty() {
            warn!(pantry = pantry.len(), "no usable ingredients selected, using whole pantry for template");
            return RecipeOutcome {
                recipe: synthesize_recipe(pantry),
                source: RecipeSource::PantryTemplate,
                selected,
            };
        }

        if let Some(text) = request_recipe(self.generator.as_ref(), &selected, preferences, &self.settings).await {
            let recipe = parse_recipe_text(&text, &selected);
            info!(title = %recipe.title, "using generated recipe");
            return RecipeOutcome {
                recipe,
                source: RecipeSource::Generated,
                selected,
            };
        }

        info!("falling back to template recipe");
        RecipeOutcome {
            recipe: synthesize_recipe(&selected),
            source: RecipeSource::Template,
            selected,
        }
    }

    /// Persists the recipe; failures are logged and yield no identifier.
    pub async fn save_recipe(&self, user_id: UserId, recipe: &Recipe) -> Option<u64> {
        match self.recipes.save(user_id, recipe).await {
            Ok(id) => {
                info!(user_id, recipe_id = id, "recipe saved");
                Some(id)
            }
            Err(e) => {
                warn!(user_id, error = %e, "failed to save recipe");
                None
            }
        }
    }

    async fn respond(&self, user_id: UserId) -> Result<String> {
        let fridge_items = self.analyze_fridge(user_id).await;
        if fridge_items.is_empty() {
            info!(user_id, "pantry is empty");
            return Ok(EMPTY_PANTRY_MESSAGE.to_string());
        }

        let preferences = self.user_preferences(user_id).await;
        let outcome = self.create_recipe(&fridge_items, &preferences).await;
        let recipe_id = self.save_recipe(user_id, &outcome.recipe).await;
        info!(user_id, source = ?outcome.source, recipe_id = ?recipe_id, "recipe ready");

        Ok(format_recipe(&outcome.recipe, recipe_id)?)
    }

    /// Entry point for "make me a recipe". Always returns text for the user,
    /// even when a collaborator panics.
    pub async fn process_user_request(&self, user_id: UserId) -> String {
        match AssertUnwindSafe(self.respond(user_id)).catch_unwind().await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                error!(user_id, error = %e, "recipe request failed");
                APOLOGY_MESSAGE.to_string()
            }
            Err(_) => {
                error!(user_id, "recipe request panicked");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }
}
