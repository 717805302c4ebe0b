pub mod catalog;
pub mod config;
pub mod fetch;
pub mod install;
pub mod logging;
pub mod progress;

#[cfg(test)]
pub(crate) mod testing;
