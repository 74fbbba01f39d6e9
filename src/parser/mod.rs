// ChartPipe DSL Parser Module

pub mod ast;
pub mod command;
pub mod geom;
pub mod labels;
pub mod lexer;
pub mod pipeline;

// Public API re-exports
pub use ast::ChartSpec;
pub use pipeline::parse_chart_spec;
