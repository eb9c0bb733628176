#![allow(missing_docs)]

pub mod backend;
pub mod error;
pub mod render;
