pub mod cli;
pub mod config;
pub mod data;
pub mod draft;
pub mod integrity;
pub mod parallel;
pub mod synergy;
pub mod tier;
