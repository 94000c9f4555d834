pub mod config;
pub mod verdict;
pub mod view;
