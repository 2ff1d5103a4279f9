pub mod audio;
pub mod commands;
pub mod config;
pub mod controller;
pub mod defaults;
pub mod logging;
pub mod net;
pub mod poller;
pub mod render;
pub mod screen;
pub mod session;
pub mod tui;
pub mod view;
