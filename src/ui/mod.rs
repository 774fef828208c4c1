pub mod components;
pub mod pages;
pub mod shell;
pub mod store;
pub mod theme;
pub mod visibility;
