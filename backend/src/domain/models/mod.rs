//! Domain rules that sit on top of the shared data model: identifier
//! generation and category naming.

pub mod category;
pub mod identifier;
