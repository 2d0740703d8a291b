pub mod bid;
pub mod project;
