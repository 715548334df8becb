//! Integration tests for the genrun generator runner

mod cli_commands;
mod config_integration;
mod repository_http;
mod test_utils;
