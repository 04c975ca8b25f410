//! Fire-and-forget spawning of helper processes (launchers, screenshot tools).

use std::ffi::OsStr;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::sync::RwLock;
use std::{io, thread};

use anyhow::Context;
use awm_config::Environment;

/// Environment changes applied to every spawned process, taken from the config.
pub static CHILD_ENV: RwLock<Environment> = RwLock::new(Environment(Vec::new()));

/// Spawns the command without waiting for it.
///
/// The process is double-forked, so it's reparented to init and never needs reaping by us.
pub fn spawn<T: AsRef<OsStr> + Send + 'static>(command: Vec<T>) {
    let _span = tracy_client::span!("spawn");

    if command.is_empty() {
        return;
    }

    // Forking and waiting for the intermediate process takes a few milliseconds.
    let res = thread::Builder::new()
        .name("Command Spawner".to_owned())
        .spawn(move || {
            let (command, args) = command.split_first().unwrap();
            if let Err(err) = spawn_sync(command, args) {
                warn!("{err:?}");
            }
        });

    if let Err(err) = res {
        warn!("error spawning a thread to spawn the command: {err:?}");
    }
}

fn spawn_sync(command: impl AsRef<OsStr>, args: &[impl AsRef<OsStr>]) -> anyhow::Result<()> {
    let command = command.as_ref();

    let mut process = Command::new(command);
    process
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    {
        let env = CHILD_ENV.read().unwrap();
        for var in &env.0 {
            match &var.value {
                Some(value) => process.env(&var.name, value),
                None => process.env_remove(&var.name),
            };
        }
    }

    // SAFETY: only async-signal-safe functions are called between fork and exec.
    unsafe {
        process.pre_exec(|| {
            match libc::fork() {
                -1 => return Err(io::Error::last_os_error()),
                0 => (),
                _ => libc::_exit(0),
            }

            Ok(())
        });
    }

    let mut child = process
        .spawn()
        .with_context(|| format!("error spawning {command:?}"))?;

    // Reaps the intermediate process, which exits right after the second fork.
    let status = child.wait().context("error waiting for the spawned process")?;
    if !status.success() {
        warn!("intermediate process for {command:?} exited with {status}");
    }

    Ok(())
}
