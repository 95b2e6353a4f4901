pub mod app;
pub mod archive;
pub mod config;
pub mod coordination;
pub mod domain;
pub mod error;
pub mod folder;
pub mod fs_util;
pub mod output;
pub mod progress;
pub mod sources;
#[cfg(test)]
mod test_support;
pub mod transport;
