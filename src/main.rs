use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fridge_chef::chef_agent::ChefAgent;
use fridge_chef::cli::{parse_args, Command};
use fridge_chef::config::ChefConfig;
use fridge_chef::generation::{ChatCompletionGenerator, GenerationService};
use fridge_chef::pantry::load_pantry_csv;
use fridge_chef::recipe::{format_recipe, CookingSkill};
use fridge_chef::recipe_requester::RequestSettings;
use fridge_chef::store::{JsonStore, PantryStore, PreferencesStore, RecipeStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli_args = parse_args();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ChefConfig::from_env().context("Failed to load configuration")?;
    let data_file = cli_args.data_file.clone().unwrap_or_else(|| config.data_file.clone());
    info!(data_file = ?data_file, model = %config.model, "starting");

    let store = Arc::new(
        JsonStore::open(&data_file)
            .await
            .with_context(|| format!("Failed to open data file {:?}", data_file))?,
    );
    let generator: Arc<dyn GenerationService> = Arc::new(ChatCompletionGenerator::from_config(&config));
    let user = cli_args.user;

    match cli_args.command {
        Command::Register => {
            if store.register_user(user).await? {
                println!("👨‍🍳 Пользователь {} зарегистрирован", user);
            } else {
                println!("✅ Пользователь {} уже зарегистрирован", user);
            }
        }
        Command::Add { entry } => {
            let entry = entry.join(" ");
            store.add_item(user, &entry).await?;
            println!("✅ Добавлено: {}", entry.trim());
        }
        Command::Import { file } => {
            let entries = load_pantry_csv(&file)?;
            for entry in &entries {
                store.add_item(user, entry).await?;
            }
            println!("✅ Импортировано продуктов: {}", entries.len());
        }
        Command::List => {
            let items = store.list_items(user).await?;
            if items.is_empty() {
                println!("😔 Холодильник пуст. Добавьте продукты!");
            } else {
                println!("🥕 В вашем холодильнике:");
                for item in items {
                    println!("• {}", item);
                }
            }
        }
        Command::Prefs {
            skill,
            dietary_preferences,
            allergies,
        } => {
            let mut prefs = store.get_preferences(user).await?;
            if let Some(skill) = skill {
                prefs.cooking_skill = CookingSkill::parse_lenient(&skill);
            }
            if !dietary_preferences.is_empty() {
                prefs.dietary_preferences = dietary_preferences;
            }
            if !allergies.is_empty() {
                prefs.allergies = allergies;
            }
            store.set_preferences(user, prefs.clone()).await?;
            println!("{:#?}", prefs);
        }
        Command::Recipe => {
            let settings = RequestSettings {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
                timeout: config.timeout,
            };
            let agent = ChefAgent::new(store.clone(), store.clone(), store.clone(), generator)
                .with_settings(settings);
            println!("{}", agent.process_user_request(user).await);
        }
        Command::History => {
            let saved = store.list_recipes(user).await?;
            if saved.is_empty() {
                println!("📖 У вас пока нет сохраненных рецептов");
            }
            for entry in saved {
                println!("#{}\n{}\n", entry.id, format_recipe(&entry.recipe, None)?);
            }
        }
        Command::Check => {
            if generator.check_connection().await {
                println!("✅ Сервис генерации отвечает");
            } else {
                println!("❌ Сервис генерации недоступен. Проверьте {}", config.api_key_env_var);
            }
        }
    }

    Ok(())
}
