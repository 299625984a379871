pub mod request;
pub mod results;
pub mod sort;
pub mod executor;
