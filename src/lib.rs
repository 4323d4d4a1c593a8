pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod documents;
pub mod models;
pub mod outcome;
pub mod pipelines;
pub mod processing;
pub mod state;
pub mod text;
