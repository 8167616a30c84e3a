mod config;
mod fizzy_client;
mod response;
