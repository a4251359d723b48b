// Each module handles one CLI subcommand. main.rs parses arguments and
// dispatches to these handlers.

pub mod compare;
pub mod network;
pub mod ports;
pub mod route;
