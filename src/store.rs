use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::pantry::category::{classify, FoodCategory};
use crate::recipe::{Recipe, SavedRecipe, UserPreferences};

pub type UserId = i64;

#[async_trait]
pub trait PantryStore: Send + Sync {
    /// Entries in insertion order; unknown users have an empty pantry.
    async fn list_items(&self, user_id: UserId) -> Result<Vec<String>>;
    async fn add_item(&self, user_id: UserId, entry: &str) -> Result<()>;
}

#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Creates the user with default preferences; returns `false` if they already existed.
    async fn register_user(&self, user_id: UserId) -> Result<bool>;
    async fn get_preferences(&self, user_id: UserId) -> Result<UserPreferences>;
    async fn set_preferences(&self, user_id: UserId, preferences: UserPreferences) -> Result<()>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persists the recipe and returns its identifier (positive, sequential).
    async fn save(&self, user_id: UserId, recipe: &Recipe) -> Result<u64>;
    /// Saved recipes, newest first.
    async fn list_recipes(&self, user_id: UserId) -> Result<Vec<SavedRecipe>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    pub entry: String,
    pub category: FoodCategory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserRecord {
    #[serde(default)]
    preferences: UserPreferences,
    #[serde(default)]
    pantry: Vec<PantryItem>,
    #[serde(default)]
    recipes: Vec<SavedRecipe>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ChefData {
    #[serde(default)]
    users: BTreeMap<UserId, UserRecord>,
    #[serde(default)]
    last_recipe_id: u64,
}

/// Users, pantries and saved recipes kept in memory, optionally mirrored to a
/// JSON file that is rewritten after every change.
pub struct JsonStore {
    storage_file: Option<PathBuf>,
    data: RwLock<ChefData>,
}

impl JsonStore {
    pub fn in_memory() -> Self {
        Self {
            storage_file: None,
            data: RwLock::new(ChefData::default()),
        }
    }

    /// Loads `storage_file` if it exists and is non-empty, otherwise starts empty.
    pub async fn open(storage_file: impl AsRef<Path>) -> Result<Self> {
        let storage_file = storage_file.as_ref().to_path_buf();
        let exists = fs::try_exists(&storage_file)
            .await
            .with_context(|| format!("Failed to check data file {:?}", storage_file))?;
        let data = if exists && fs::metadata(&storage_file).await?.len() > 0 {
            let contents = fs::read_to_string(&storage_file)
                .await
                .with_context(|| format!("Failed to read data file {:?}", storage_file))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Data file {:?} is not valid chef data", storage_file))?
        } else {
            ChefData::default()
        };

        Ok(Self {
            storage_file: Some(storage_file),
            data: RwLock::new(data),
        })
    }

    /// Applies `change` to a copy of the data and keeps it only once the copy
    /// has been written. On any error the store is left as it was.
    async fn update<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut ChefData) -> T + Send,
        T: Send,
    {
        let mut data = self.data.write().await;
        let mut next = data.clone();
        let result = change(&mut next);
        self.persist(&next).await?;
        *data = next;
        Ok(result)
    }

    async fn persist(&self, data: &ChefData) -> Result<()> {
        if let Some(path) = &self.storage_file {
            let serialized = serde_json::to_string_pretty(data)?;
            fs::write(path, serialized)
                .await
                .with_context(|| format!("Failed to write data file {:?}", path))?;
            debug!(path = ?path, "data file saved");
        }
        Ok(())
    }

    pub async fn pantry_items(&self, user_id: UserId) -> Vec<PantryItem> {
        let data = self.data.read().await;
        data.users
            .get(&user_id)
            .map(|user| user.pantry.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PantryStore for JsonStore {
    async fn list_items(&self, user_id: UserId) -> Result<Vec<String>> {
        Ok(self
            .pantry_items(user_id)
            .await
            .into_iter()
            .map(|item| item.entry)
            .collect())
    }

    async fn add_item(&self, user_id: UserId, entry: &str) -> Result<()> {
        let entry = entry.trim();
        if entry.is_empty() {
            anyhow::bail!("Pantry entry must not be empty");
        }
        let item = PantryItem {
            entry: entry.to_string(),
            category: classify(entry),
        };
        self.update(|data| data.users.entry(user_id).or_default().pantry.push(item))
            .await
    }
}

#[async_trait]
impl PreferencesStore for JsonStore {
    async fn register_user(&self, user_id: UserId) -> Result<bool> {
        if self.data.read().await.users.contains_key(&user_id) {
            return Ok(false);
        }
        self.update(|data| {
            if data.users.contains_key(&user_id) {
                return false;
            }
            data.users.insert(user_id, UserRecord::default());
            true
        })
        .await
    }

    async fn get_preferences(&self, user_id: UserId) -> Result<UserPreferences> {
        let data = self.data.read().await;
        Ok(data
            .users
            .get(&user_id)
            .map(|user| user.preferences.clone())
            .unwrap_or_default())
    }

    async fn set_preferences(&self, user_id: UserId, preferences: UserPreferences) -> Result<()> {
        self.update(|data| data.users.entry(user_id).or_default().preferences = preferences)
            .await
    }
}

#[async_trait]
impl RecipeStore for JsonStore {
    async fn save(&self, user_id: UserId, recipe: &Recipe) -> Result<u64> {
        self.update(|data| {
            data.last_recipe_id += 1;
            let id = data.last_recipe_id;
            data.users.entry(user_id).or_default().recipes.push(SavedRecipe {
                id,
                recipe: recipe.clone(),
            });
            id
        })
        .await
    }

    async fn list_recipes(&self, user_id: UserId) -> Result<Vec<SavedRecipe>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .get(&user_id)
            .map(|user| user.recipes.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{CookingSkill, Difficulty};
    use tempfile::TempDir;

    fn recipe(title: &str) -> Recipe {
        Recipe {
            title: title.to_string(),
            ingredients: vec!["лук - 1 шт".to_string()],
            instructions: vec!["1. Жарьте".to_string()],
            cooking_time: 10,
            difficulty: Difficulty::Easy,
        }
    }

    #[tokio::test]
    async fn test_pantry_round_trip_and_validation() -> Result<()> {
        let store = JsonStore::in_memory();
        assert!(store.list_items(1).await?.is_empty());

        store.add_item(1, "  яйца 3 шт ").await?;
        store.add_item(1, "лук 1 шт").await?;
        store.add_item(2, "рис").await?;
        assert!(store.add_item(1, "   ").await.is_err());

        assert_eq!(store.list_items(1).await?, vec!["яйца 3 шт", "лук 1 шт"]);
        let items = store.pantry_items(1).await;
        assert_eq!(items[0].category, FoodCategory::Protein);
        assert_eq!(items[1].category, FoodCategory::Vegetable);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_and_preferences() -> Result<()> {
        let store = JsonStore::in_memory();
        assert_eq!(store.get_preferences(5).await?, UserPreferences::default());
        assert!(store.register_user(5).await?);
        assert!(!store.register_user(5).await?);

        let prefs = UserPreferences {
            dietary_preferences: vec!["без глютена".to_string()],
            allergies: vec!["орехи".to_string()],
            cooking_skill: CookingSkill::Intermediate,
        };
        store.set_preferences(5, prefs.clone()).await?;
        assert_eq!(store.get_preferences(5).await?, prefs);
        Ok(())
    }

    #[tokio::test]
    async fn test_recipe_ids_are_sequential_and_listed_newest_first() -> Result<()> {
        let store = JsonStore::in_memory();
        assert_eq!(store.save(1, &recipe("первый")).await?, 1);
        assert_eq!(store.save(2, &recipe("чужой")).await?, 2);
        assert_eq!(store.save(1, &recipe("второй")).await?, 3);

        let saved = store.list_recipes(1).await?;
        let titles: Vec<&str> = saved.iter().map(|s| s.recipe.title.as_str()).collect();
        assert_eq!(titles, vec!["второй", "первый"]);
        assert_eq!(saved[0].id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("chef.json");

        {
            let store = JsonStore::open(&path).await?;
            store.add_item(9, "курица 300г").await?;
            store.save(9, &recipe("Курица")).await?;
        }

        let reopened = JsonStore::open(&path).await?;
        assert_eq!(reopened.list_items(9).await?, vec!["курица 300г"]);
        assert_eq!(reopened.list_recipes(9).await?[0].recipe.title, "Курица");
        assert_eq!(reopened.save(9, &recipe("Ещё")).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("chef.json");
        std::fs::write(&path, "not json")?;
        let err = JsonStore::open(&path).await.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("not valid chef data"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("chef.json");
        let store = JsonStore::open(&path).await?;
        store.add_item(1, "яйца 3 шт").await?;
        assert_eq!(store.save(1, &recipe("Омлет")).await?, 1);

        // A directory in place of the data file makes every write fail.
        std::fs::remove_file(&path)?;
        std::fs::create_dir(&path)?;

        assert!(store.add_item(1, "лук 1 шт").await.is_err());
        assert_eq!(store.list_items(1).await?, vec!["яйца 3 шт"]);

        assert!(store.save(1, &recipe("Суп")).await.is_err());
        assert_eq!(store.list_recipes(1).await?.len(), 1);

        assert!(store.register_user(2).await.is_err());
        assert!(store
            .set_preferences(1, UserPreferences {
                cooking_skill: CookingSkill::Advanced,
                ..UserPreferences::default()
            })
            .await
            .is_err());
        assert_eq!(store.get_preferences(1).await?, UserPreferences::default());

        std::fs::remove_dir(&path)?;
        assert!(store.register_user(2).await?);
        assert_eq!(store.save(1, &recipe("Суп")).await?, 2);

        let reopened = JsonStore::open(&path).await?;
        assert_eq!(reopened.list_items(1).await?, vec!["яйца 3 шт"]);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_data_file_under_a_regular_file_is_an_error() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        let path = file.path().join("chef.json");
        assert!(JsonStore::open(&path).await.is_err());
        Ok(())
    }
}
