//! A small personal-site server: static files from a directory plus a JSON
//! listing of blog entries.

pub mod cli;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
