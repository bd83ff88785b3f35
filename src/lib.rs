pub mod api;
pub mod config;
pub mod encoding;
pub mod forms;
pub mod model;
pub mod nav;
pub mod schema;
pub mod shell;
pub mod views;
pub mod widgets;
