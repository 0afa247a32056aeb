pub mod args;
pub mod database;
pub mod model;
pub mod service;
pub mod utils;
