pub mod boys;
pub mod truncated;
