pub mod app;
pub mod cli;
pub mod error;
pub mod event;
pub mod feed;
pub mod model;
pub mod paths;
pub mod resolve;
pub mod shell;
pub mod store;
pub mod view;
