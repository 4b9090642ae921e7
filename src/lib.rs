//! Taskweave - a task dependency graph engine with kanban and mind-map views.
//!
//! This library provides the core functionality for the `tw` CLI tool:
//! turning a free-text project description into a dependency-ordered set of
//! tasks, deriving execution readiness from the dependency graph, and
//! projecting the graph into kanban columns or a positioned mind map with a
//! staged execution animation.

pub mod cli;
pub mod commands;
pub mod config;
pub mod executor;
pub mod generator;
pub mod mindmap;
pub mod models;
pub mod storage;
pub mod workspace;

/// Library-level error type for taskweave operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not initialized: run `tw init` first")]
    NotInitialized,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generator produced unusable output: {0}")]
    Generator(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for taskweave operations.
pub type Result<T> = std::result::Result<T, Error>;
