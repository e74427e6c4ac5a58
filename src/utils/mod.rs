pub mod error;

pub use error::{InitError, INIT_FAILURE_EXIT_CODE};
