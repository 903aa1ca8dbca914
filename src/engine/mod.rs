pub mod process;
pub mod types;

pub use process::SystemRunner;
pub use types::{Invocation, RunError, RunOutput};

/// Seam for every external process this crate spawns.
pub trait Runner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput, RunError>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput, RunError> {
        (**self).run(invocation)
    }
}
