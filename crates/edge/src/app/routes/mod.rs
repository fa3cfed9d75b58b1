pub mod actions;
pub mod pages;
pub mod system;
