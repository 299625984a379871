pub mod key;
pub mod flatten;
pub mod field_index;
