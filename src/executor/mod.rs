mod executor;
mod default_executor;
mod spawn;

pub use executor::{Executor, ExecError, ExecOutcome, ExecResult};
pub use default_executor::DefaultExecutor;
