//! Match engine: rules enforcement over an injected store.

mod error;
mod logger;
mod match_engine;

pub use error::{ErrorClass, MatchError, MatchErrorKind};
pub use logger::{MatchLogger, TracingLogger};
pub use match_engine::{FIRST_TURN, MatchEngine, run_blocking};
