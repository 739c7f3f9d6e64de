pub mod current;
pub mod historical;
