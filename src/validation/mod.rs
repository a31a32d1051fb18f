// src/validation/mod.rs

pub mod brief;

pub use brief::Brief;
