pub mod config;
pub mod files;
pub mod generate;
pub mod health;
pub mod save_video;
pub mod task;
pub mod tasks;
pub mod upload;
