#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod discovery;

#[cfg(test)]
pub(crate) mod fixture;
