pub mod arrival;
pub mod completion;
