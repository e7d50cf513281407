pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod post;
pub mod route;
pub mod utils;
pub mod view;
