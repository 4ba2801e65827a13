pub mod arguments;
pub mod config;
pub mod database;
pub mod errors;
pub mod intel;
pub mod logger;
pub mod monitor;
pub mod notifications;
pub mod run;
pub mod shutdown;
