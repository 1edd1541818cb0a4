pub mod aggregate;
pub mod index;
pub mod strategies;
