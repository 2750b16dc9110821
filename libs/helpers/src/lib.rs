pub mod candidates;
pub mod heap;
