//! Module for running child processes in their own process group
//!
//! A terminal interrupt (CTRL+C) gets sent to the whole foreground process group,
//! so children in their own group keep running until this process decides what to do with them.

use std::{
	process::Command,
	sync::Mutex,
};

/// Process group ids of the currently running children, see [`GroupGuard`]
static RUNNING_GROUPS: Mutex<Vec<u32>> = Mutex::new(Vec::new());

/// Set `expression` to start in a new process group (unix only, other platforms are unchanged)
/// The new group id is the same as the pid of the started child
#[must_use]
pub fn own_process_group(expression: duct::Expression) -> duct::Expression {
	return expression.before_spawn(|cmd| {
		set_new_process_group(cmd);

		return Ok(());
	});
}

#[cfg(unix)]
fn set_new_process_group(cmd: &mut Command) {
	use std::os::unix::process::CommandExt;
	cmd.process_group(0);
}

#[cfg(not(unix))]
fn set_new_process_group(_cmd: &mut Command) {}

/// Keeps process groups registered as running until dropped
#[derive(Debug)]
pub struct GroupGuard {
	groups: Vec<u32>,
}

impl GroupGuard {
	/// Register `groups` as running
	pub fn register(groups: Vec<u32>) -> Self {
		match RUNNING_GROUPS.lock() {
			Ok(mut lock) => lock.extend_from_slice(&groups),
			Err(err) => warn!("Could not register running process groups: {}", err),
		}

		return Self { groups };
	}
}

impl Drop for GroupGuard {
	fn drop(&mut self) {
		if let Ok(mut lock) = RUNNING_GROUPS.lock() {
			lock.retain(|v| return !self.groups.contains(v));
		}
	}
}

/// Get the currently registered process groups
pub fn running_groups() -> Vec<u32> {
	return match RUNNING_GROUPS.lock() {
		Ok(lock) => lock.clone(),
		Err(_) => Vec::new(),
	};
}

/// Send a termination signal to all registered process groups
/// Meant to be called right before this process exits, so that no child is left behind
pub fn terminate_running() {
	for group in running_groups() {
		debug!("Terminating process group {}", group);

		// a negative pid addresses the whole group
		let res = duct::cmd!("kill", "-TERM", "--", format!("-{group}"))
			.stdin_null()
			.stdout_null()
			.stderr_null()
			.unchecked()
			.run();

		if let Err(err) = res {
			warn!("Could not terminate process group {}: {}", group, err);
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_guard_registers_until_drop() {
		// values above the linux pid limit, so no real process can be hit
		let guard = GroupGuard::register(vec![u32::MAX - 1, u32::MAX - 2]);

		let running = running_groups();
		assert!(running.contains(&(u32::MAX - 1)));
		assert!(running.contains(&(u32::MAX - 2)));

		drop(guard);

		let running = running_groups();
		assert!(!running.contains(&(u32::MAX - 1)));
		assert!(!running.contains(&(u32::MAX - 2)));
	}

	/// Run `sh` to print its own pid and process group id, in that order
	#[cfg(target_os = "linux")]
	fn pid_and_group(expression: duct::Expression) -> (String, String) {
		let output = expression.read().expect("Expected sh to run");
		let mut lines = output.lines();
		let pid = lines.next().expect("Expected a pid line").trim().to_owned();
		let stat = lines.next().expect("Expected a stat line");
		// the fields after the command name are "state ppid pgrp ..."
		let (_, after_comm) = stat.rsplit_once(')').expect("Expected a command name in stat");
		let pgrp = after_comm
			.split_whitespace()
			.nth(2)
			.expect("Expected a pgrp field")
			.to_owned();

		return (pid, pgrp);
	}

	#[test]
	#[cfg(target_os = "linux")]
	fn test_own_process_group() {
		let script = "echo $$; cat /proc/$$/stat";

		let (pid, pgrp) = pid_and_group(own_process_group(duct::cmd!("sh", "-c", script)));
		assert_eq!(pid, pgrp);

		// without it, the child stays in the group of the test process
		let (pid, pgrp) = pid_and_group(duct::cmd!("sh", "-c", script));
		assert_ne!(pid, pgrp);
	}
}
