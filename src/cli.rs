pub mod cli_parser;
pub use cli_parser::Cli;

pub mod commands;
pub use commands::Commands;

pub mod field_spec;
pub use field_spec::{FieldKind, FieldValue};

pub mod help_template;
pub use help_template::HELP_TEMPLATE;

pub mod execute_command;
pub use execute_command::execute_command;
