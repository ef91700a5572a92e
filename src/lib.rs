pub mod asset;
pub mod commands;
pub mod embed;
pub mod github;
pub mod http;
pub mod page;
pub mod runtime;
