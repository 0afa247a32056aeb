pub mod config;
pub mod constants;
pub mod decay;
pub mod error;
pub mod glicko_model;
pub mod internal_rating;
pub mod match_processor;
pub mod outcome;
pub mod rating_engine;
pub mod rating_tracker;
pub mod structures;
pub mod tie_reconciler;
pub mod volatility;
