pub mod ast;
pub mod wildcard;
