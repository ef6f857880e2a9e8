pub mod candidates;
pub mod compare;
pub mod predict;
pub mod summarize;
