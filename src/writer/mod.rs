pub mod batch;
pub mod gateway;
