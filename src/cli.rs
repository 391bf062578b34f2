use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turns what is in your fridge into a recipe", long_about = None)]
pub struct Cli {
    /// Data file holding users, pantries and saved recipes (overrides CHEF_DATA_FILE)
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// User the command acts on
    #[arg(short, long, default_value_t = 1)]
    pub user: i64,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register the user with default preferences
    Register,
    /// Add a pantry entry, e.g. "яйца 3 шт"
    Add {
        #[arg(required = true, num_args = 1..)]
        entry: Vec<String>,
    },
    /// Bulk-add pantry entries from a CSV file with `name` and `quantity` columns
    Import { file: PathBuf },
    /// Show the pantry
    List,
    /// Update cooking skill, dietary preferences and allergies
    Prefs {
        #[arg(long)]
        skill: Option<String>,
        #[arg(long = "diet")]
        dietary_preferences: Vec<String>,
        #[arg(long = "allergy")]
        allergies: Vec<String>,
    },
    /// Create a recipe from the pantry
    Recipe,
    /// Show saved recipes, newest first
    History,
    /// Check that the generation service answers
    Check,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_joins_words() {
        let cli = Cli::try_parse_from(["fridge_chef", "--user", "42", "add", "яйца", "3", "шт"]).unwrap();
        assert_eq!(cli.user, 42);
        match cli.command {
            Command::Add { entry } => assert_eq!(entry.join(" "), "яйца 3 шт"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_prefs_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "fridge_chef", "prefs", "--skill", "опытный", "--diet", "без мяса", "--allergy", "орехи", "--allergy", "мед",
        ])
        .unwrap();
        match cli.command {
            Command::Prefs { skill, dietary_preferences, allergies } => {
                assert_eq!(skill.as_deref(), Some("опытный"));
                assert_eq!(dietary_preferences, vec!["без мяса"]);
                assert_eq!(allergies, vec!["орехи", "мед"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_add_requires_entry() {
        assert!(Cli::try_parse_from(["fridge_chef", "add"]).is_err());
    }
}
