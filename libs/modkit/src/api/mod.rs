pub mod context;
pub mod problem;
