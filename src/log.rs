mod error;
mod message;
mod visual;

pub use error::{Error, ErrorKind};
pub use message::*;
pub use visual::{Pointer, Visual};

const RED: &str = "\x1B[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1B[0m";
