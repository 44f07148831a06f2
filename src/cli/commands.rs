use crate::cli::{FieldKind, FieldValue};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append one pickle built from `kind:value` fields
    Append {
        /// Fields in write order, e.g. `int:7 string:hello data:deadbeef`
        #[arg(required = true, value_name = "FIELD")]
        fields: Vec<FieldValue>,
    },

    /// List every complete pickle in the file
    List,

    /// Decode one pickle with the given field kinds
    Decode {
        /// Zero-based position of the pickle in the file
        index: usize,

        /// Field kinds in read order, e.g. `int string bytes:4`
        #[arg(required = true, value_name = "KIND")]
        kinds: Vec<FieldKind>,
    },

    /// Get current state of the pickle file
    Info,
}
