/*
 * Responsibility
 * - HTTP surface: route table, per-route stage chains, handlers, DTOs
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod pipeline;
mod routes;

pub use pipeline::{PipelineError, Stage, pipeline};
pub use routes::routes;
