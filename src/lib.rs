pub mod auth;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod resolver;
pub mod web;
