pub mod app_config;
pub mod create_user;
pub mod db;
pub mod email;
pub mod middleware;
pub mod moderation;
pub mod notifications;
pub mod orm;
pub mod seed;
pub mod session;
pub mod user;
pub mod votes;
pub mod web;
