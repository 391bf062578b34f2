pub mod category;
pub mod import;
pub mod selector;

pub use category::{classify, FoodCategory};
pub use import::load_pantry_csv;
pub use selector::select_ingredients;
