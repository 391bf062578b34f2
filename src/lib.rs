pub mod api_connection;
pub mod chef_agent;
pub mod cli;
pub mod config;
pub mod generation;
pub mod pantry;
pub mod recipe;
pub mod recipe_parser;
pub mod recipe_requester;
pub mod store;
pub mod template;
