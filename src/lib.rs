use config::Config;
use service::UserService;
use std::sync::Arc;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod service;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub config: Config,
}
