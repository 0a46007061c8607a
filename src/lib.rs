pub mod activity;
pub mod combined;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod form;
pub mod pipeline;
pub mod rolling;
pub mod roster;
pub mod scoring;
pub mod selection;
pub mod stats;
