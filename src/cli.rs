//! CLI domain: parse, route, output, and presentation only.
//! Generation itself lives in the service; the route table only wires it up.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, write_artifact};
pub use parse::{parse_parameter, Cli, Commands, GenerateArgs};
pub use route::RunContext;
