// Library exports for venueviz

pub mod csv_reader;
pub mod data;
pub mod palette;
pub mod parser;
pub mod runtime;

// Pipeline Modules
pub mod ir;
pub mod aggregate;
pub mod scale;
pub mod pack;
pub mod layout;
pub mod svg;
