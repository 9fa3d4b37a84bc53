// Output generation module

pub mod templates;

pub use templates::*;
