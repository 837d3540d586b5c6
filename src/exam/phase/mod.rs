mod finished;
mod in_progress;

pub use self::finished::*;
pub use self::in_progress::*;
