//! Request and response bodies

pub mod portfolio;
