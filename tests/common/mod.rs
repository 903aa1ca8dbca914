#![allow(dead_code)]

use mdpdf_ja::engine::{Invocation, RunError, RunOutput, Runner};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// Replays canned results in order and records every invocation.
/// Once the queue is empty every further call reports the program as missing.
#[derive(Default)]
pub struct StubRunner {
    replies: RefCell<VecDeque<Result<RunOutput, RunError>>>,
    calls: RefCell<Vec<Invocation>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, r: Result<RunOutput, RunError>) -> Self {
        self.replies.borrow_mut().push_back(r);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl Runner for StubRunner {
    fn run(&self, inv: &Invocation) -> Result<RunOutput, RunError> {
        self.calls.borrow_mut().push(inv.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| not_found(&inv.program))
    }
}

pub fn exited(code: i32, stdout: &str, stderr: &str) -> Result<RunOutput, RunError> {
    Ok(RunOutput {
        code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        duration: Duration::from_millis(5),
    })
}

pub fn ok(stdout: &str) -> Result<RunOutput, RunError> {
    exited(0, stdout, "")
}

pub fn not_found(program: &str) -> Result<RunOutput, RunError> {
    Err(RunError::NotFound {
        program: program.to_string(),
    })
}
