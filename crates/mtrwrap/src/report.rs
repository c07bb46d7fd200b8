pub mod csv;
pub mod json;
pub mod raw;
pub mod table;
mod types;
