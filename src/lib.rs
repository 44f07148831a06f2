//! Length-prefixed binary pickles.
//!
//! A [`Pickle`] accumulates fixed-width scalars, strings and blobs into one
//! contiguous, header-prefixed buffer. A [`PickleIterator`] reads them back
//! in the same order with every length checked against the bytes that are
//! actually present.
//!
//! ```
//! use r_pickle::Pickle;
//!
//! let mut pickle = Pickle::new();
//! pickle.write_int(7);
//! pickle.write_string("seven");
//!
//! let mut iter = pickle.iter();
//! assert_eq!(iter.read_int(), Some(7));
//! assert_eq!(iter.read_string().as_deref(), Some("seven"));
//! assert!(iter.reached_end());
//! ```

pub mod pickle_engine;
pub use pickle_engine::*;

pub mod utils;
pub use utils::*;

pub mod cli;
