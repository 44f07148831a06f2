mod pickle_read;
pub use pickle_read::PickleRead;

mod pickle_write;
pub use pickle_write::PickleWrite;
