mod error;
mod example;
mod message;
mod runnable;
mod timed;
mod value;

pub use error::SafegroundError;
pub use example::{Candidate, Domain, ErrorRecord, Example, Outcome, Snippet};
pub use message::{Message, Role};
pub use runnable::Runnable;
pub use timed::Timed;
pub use value::{IntoValue, Value};
