use super::{Invocation, RunError, RunOutput, Runner};
use std::io::{ErrorKind, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Spawns real processes with captured text output.
///
/// On unix each child leads its own process group so a timeout can take down
/// the LaTeX engine pandoc starts underneath it, not just pandoc.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Runner for SystemRunner {
    fn run(&self, inv: &Invocation) -> Result<RunOutput, RunError> {
        debug!("spawn {} timeout={:?}", inv.display_line(), inv.timeout);
        let started = Instant::now();

        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => RunError::NotFound {
                program: inv.program.clone(),
            },
            _ => io_error(&inv.program, e),
        })?;

        interrupt::track(&child);
        let waited = wait_with_timeout(&mut child, &inv.program, inv.timeout);
        interrupt::untrack();
        let (status, stdout, stderr) = waited?;

        Ok(RunOutput {
            code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            duration: started.elapsed(),
        })
    }
}

fn io_error(program: &str, err: std::io::Error) -> RunError {
    RunError::Io {
        program: program.to_string(),
        message: err.to_string(),
    }
}

fn drain<R: Read + Send + 'static>(reader: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut r) = reader {
            r.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join(program: &str, handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>, RunError> {
    handle
        .join()
        .map_err(|_| RunError::Io {
            program: program.to_string(),
            message: "output reader thread panicked".to_string(),
        })?
        .map_err(|e| io_error(program, e))
}

fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = i32::try_from(child.id()) {
            // SAFETY: killpg only sends a signal; the group was created at spawn.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
}

fn wait_with_timeout(
    child: &mut Child,
    program: &str,
    timeout: Option<Duration>,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), RunError> {
    // Drain pipes while waiting; LaTeX engines write enough to fill a pipe buffer.
    let stdout_thread = drain(child.stdout.take());
    let stderr_thread = drain(child.stderr.take());

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(|e| io_error(program, e))? {
            let stdout = join(program, stdout_thread)?;
            let stderr = join(program, stderr_thread)?;
            return Ok((status, stdout, stderr));
        }

        if let Some(limit) = timeout {
            if start.elapsed() > limit {
                warn!("{program} timed out after {:?}", limit);
                kill_tree(child);
                let _ = child.wait();
                // Reader threads are detached: a survivor still holding the
                // pipes must not extend the bound.
                return Err(RunError::TimedOut {
                    program: program.to_string(),
                    timeout: limit,
                });
            }
        }

        std::thread::sleep(Duration::from_millis(20));
    }
}

/// Ctrl-C handling for the CLI. Children live in their own process group and
/// no longer see the terminal's SIGINT, so it is forwarded to the tracked group.
pub mod interrupt {
    use std::process::Child;
    use std::sync::atomic::{AtomicI32, Ordering};

    static CURRENT_GROUP: AtomicI32 = AtomicI32::new(0);

    pub(super) fn track(child: &Child) {
        let pgid = i32::try_from(child.id()).unwrap_or(0);
        CURRENT_GROUP.store(pgid, Ordering::SeqCst);
    }

    pub(super) fn untrack() {
        CURRENT_GROUP.store(0, Ordering::SeqCst);
    }

    #[cfg(unix)]
    extern "C" fn on_interrupt(_sig: libc::c_int) {
        let pgid = CURRENT_GROUP.load(Ordering::SeqCst);
        // SAFETY: killpg and _exit are async-signal-safe.
        unsafe {
            if pgid > 0 {
                libc::killpg(pgid, libc::SIGKILL);
            }
            libc::_exit(130);
        }
    }

    /// Installs the SIGINT/SIGTERM handler. Call once from the binary.
    pub fn install() {
        #[cfg(unix)]
        {
            let handler = on_interrupt as extern "C" fn(libc::c_int) as libc::sighandler_t;
            // SAFETY: the handler only touches an atomic and async-signal-safe calls.
            unsafe {
                libc::signal(libc::SIGINT, handler);
                libc::signal(libc::SIGTERM, handler);
            }
        }
    }
}
