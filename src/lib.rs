pub mod api;
pub mod app;
pub mod channel;
pub mod cli;
pub mod command;
pub mod config;
pub mod event;
pub mod form;
pub mod help;
pub mod history;
pub mod keybindings;
pub mod logging;
pub mod lookup;
pub mod slot;
pub mod store;
pub mod ui;
