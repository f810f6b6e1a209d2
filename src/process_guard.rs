//! Lifecycle management for spawned package-manager processes
//!
//! Installer processes are long-running and may outlive the menu if it is
//! killed mid-run. Each one is started in its own process group and tracked
//! in a global registry; on shutdown the registry signals every group with
//! SIGTERM and escalates to SIGKILL after a grace period.

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

/// Grace period used when the menu shuts down normally
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Grace period used from a signal handler
pub const SIGNAL_GRACE: Duration = Duration::from_secs(3);

static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// Process-group leaders of running installers
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: HashSet<u32>,
    /// Set once termination has started so a second caller is a no-op
    cleanup_initiated: bool,
}

impl ChildRegistry {
    /// Shared registry used by every installer
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        tracing::debug!(pid, "Registered installer process");
    }

    pub fn unregister(&mut self, pid: u32) {
        self.pids.remove(&pid);
        tracing::debug!(pid, "Unregistered installer process");
    }

    pub fn count(&self) -> usize {
        self.pids.len()
    }

    /// Signal every tracked process group: SIGTERM, wait up to
    /// `grace_period`, then SIGKILL whatever is left.
    pub fn terminate_all(&mut self, grace_period: Duration) {
        if self.cleanup_initiated {
            return;
        }
        self.cleanup_initiated = true;

        if self.pids.is_empty() {
            return;
        }

        let pids: Vec<u32> = self.pids.iter().copied().collect();
        tracing::info!("Terminating {} installer process(es)", pids.len());

        for &pid in &pids {
            signal_group_or_process(pid, Signal::SIGTERM);
        }

        let start = Instant::now();
        while start.elapsed() < grace_period {
            if pids.iter().all(|&pid| !is_process_alive(pid)) {
                tracing::info!("All installer processes exited");
                self.pids.clear();
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        for &pid in &pids {
            if is_process_alive(pid) {
                tracing::warn!(pid, "Installer did not exit after SIGTERM, sending SIGKILL");
                signal_group_or_process(pid, Signal::SIGKILL);
            }
        }

        self.pids.clear();
    }
}

/// Registration that lasts as long as a spawned installer.
///
/// Unregisters on drop, so an early return while reading output cannot leak
/// a stale PID into the registry.
#[derive(Debug)]
pub struct RegisteredChild {
    pid: u32,
    registry: Arc<Mutex<ChildRegistry>>,
}

impl RegisteredChild {
    pub fn register(pid: u32) -> Self {
        Self::register_in(pid, ChildRegistry::global())
    }

    pub fn register_in(pid: u32, registry: Arc<Mutex<ChildRegistry>>) -> Self {
        if let Ok(mut guard) = registry.lock() {
            guard.register(pid);
        }
        Self { pid, registry }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for RegisteredChild {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.registry.lock() {
            guard.unregister(self.pid);
        }
    }
}

/// Terminates every registered installer when dropped.
///
/// Held by `main` for the lifetime of the session.
pub struct ProcessGuard {
    registry: Arc<Mutex<ChildRegistry>>,
}

impl ProcessGuard {
    pub fn new() -> Self {
        Self {
            registry: ChildRegistry::global(),
        }
    }

    pub fn child_count(&self) -> usize {
        self.registry.lock().map(|r| r.count()).unwrap_or(0)
    }
}

impl Default for ProcessGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.terminate_all(SHUTDOWN_GRACE);
        }
    }
}

/// Install handlers for SIGINT, SIGTERM and SIGHUP.
///
/// On delivery the handler thread terminates every registered installer,
/// runs `on_signal` (used to restore the terminal) and exits with
/// `128 + signal`.
pub fn init_signal_handlers<F>(on_signal: F) -> std::io::Result<()>
where
    F: Fn() + Send + 'static,
{
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            let name = match sig {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                SIGHUP => "SIGHUP",
                _ => "signal",
            };
            tracing::info!("Received {}, stopping installers", name);

            if let Ok(mut registry) = ChildRegistry::global().lock() {
                registry.terminate_all(SIGNAL_GRACE);
            }
            on_signal();
            std::process::exit(128 + sig);
        }
    });

    Ok(())
}

/// Extension for `std::process::Command`: run the child as the leader of a
/// fresh process group, and on Linux ask the kernel to SIGTERM it if the
/// menu dies first.
pub trait CommandProcessGroup {
    fn in_new_process_group(&mut self) -> &mut Self;
}

impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;

        self.process_group(0);
        set_parent_death_signal(self);
        self
    }
}

#[cfg(target_os = "linux")]
fn set_parent_death_signal(cmd: &mut std::process::Command) {
    use std::os::unix::process::CommandExt;

    // SAFETY: prctl is async-signal-safe and touches no parent state.
    unsafe {
        cmd.pre_exec(|| {
            if nix::libc::prctl(nix::libc::PR_SET_PDEATHSIG, nix::libc::SIGTERM) == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

#[cfg(not(target_os = "linux"))]
fn set_parent_death_signal(_cmd: &mut std::process::Command) {}

fn signal_group_or_process(pid: u32, sig: Signal) {
    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    // Negative PID addresses the whole group, so helpers the installer
    // started are signalled too
    if let Err(e) = signal::kill(Pid::from_raw(-raw), sig) {
        tracing::debug!(pid, "Group signal failed ({}), signalling process", e);
        if let Err(e) = signal::kill(Pid::from_raw(raw), sig) {
            tracing::warn!(pid, "Failed to send {:?}: {}", sig, e);
        }
    }
}

/// Alive means present and neither zombie nor dead
fn is_process_alive(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if signal::kill(Pid::from_raw(raw), None).is_err() {
        return false;
    }

    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        // The state field follows the parenthesised command name
        if let Some(state) = stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
        {
            return !matches!(state, "Z" | "X");
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
    use std::process::Command;

    fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
        let start = Instant::now();
        let nix_pid = Pid::from_raw(pid as i32);
        while start.elapsed() < timeout {
            match waitpid(nix_pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => return true,
                Err(nix::errno::Errno::ECHILD) if !is_process_alive(pid) => return true,
                _ => {}
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_registry_register_unregister() {
        let mut registry = ChildRegistry::default();
        registry.register(1234);
        registry.register(5678);
        registry.register(1234);
        assert_eq!(registry.count(), 2);

        registry.unregister(1234);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_registered_child_unregisters_on_drop() {
        let registry = Arc::new(Mutex::new(ChildRegistry::default()));
        {
            let child = RegisteredChild::register_in(4242, Arc::clone(&registry));
            assert_eq!(child.pid(), 4242);
            assert_eq!(registry.lock().unwrap().count(), 1);
        }
        assert_eq!(registry.lock().unwrap().count(), 0);
    }

    #[test]
    fn test_terminate_all_kills_process_group() {
        let child = Command::new("sh")
            .args(["-c", "sleep 60"])
            .in_new_process_group()
            .spawn()
            .expect("Failed to spawn sleep");
        let pid = child.id();

        let mut registry = ChildRegistry::default();
        registry.register(pid);
        assert!(is_process_alive(pid));

        registry.terminate_all(Duration::from_millis(500));
        assert!(wait_for_exit(pid, Duration::from_secs(2)), "Installer should be gone");
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_terminate_all_runs_once() {
        let mut registry = ChildRegistry::default();
        registry.register(999_999);
        registry.terminate_all(Duration::from_millis(10));
        assert!(registry.cleanup_initiated);

        registry.register(999_998);
        registry.terminate_all(Duration::from_millis(10));
        assert_eq!(registry.count(), 1, "Second call must not touch the registry");
    }

    #[test]
    fn test_terminate_all_tolerates_reaped_process() {
        let mut child = Command::new("sh")
            .args(["-c", "exit 0"])
            .spawn()
            .expect("Failed to spawn sh");
        let pid = child.id();
        let _ = child.wait();

        let mut registry = ChildRegistry::default();
        registry.register(pid);
        registry.terminate_all(Duration::from_millis(100));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_is_process_alive_nonexistent() {
        assert!(!is_process_alive(999_999));
        assert!(!is_process_alive(u32::MAX));
    }
}
