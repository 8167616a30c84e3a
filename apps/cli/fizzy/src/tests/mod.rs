mod auth;
mod commands;
mod pseudo_columns;
