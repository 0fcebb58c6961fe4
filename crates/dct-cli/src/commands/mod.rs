pub mod add;
pub mod calendar;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod refresh;
pub mod remote;
pub mod search;
