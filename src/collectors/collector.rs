//! Collector trait and the shared file-copy / process-capture base.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context as _, Result};
use log::debug;

use crate::context::CollectionContext;
use crate::models::{CollectorKind, Outcome};
use crate::topology::TargetKind;

/// One unit of diagnostic work. Collectors read the shared context and
/// write only under the output directory; they never touch the context
/// or the topology.
pub trait Collector {
    fn kind(&self) -> CollectorKind;
    fn collect(&self, ctx: &CollectionContext) -> Outcome;
}

/// Copy a file, or recursively a directory tree, into `dest_dir`,
/// creating `dest_dir` if absent. A missing source is an error the
/// caller folds into a non-fatal outcome; collection continues.
pub fn copy_to_destination(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    debug!(
        "Copying {} into {}",
        source.display(),
        dest_dir.display()
    );
    fs::create_dir_all(dest_dir)
        .context(format!("Failed to create directory: {}", dest_dir.display()))?;

    let metadata = fs::metadata(source)
        .context(format!("Source not found: {}", source.display()))?;

    let file_name = source
        .file_name()
        .context(format!("Source has no file name: {}", source.display()))?;
    let dest = dest_dir.join(file_name);

    if metadata.is_dir() {
        fs::create_dir_all(&dest)
            .context(format!("Failed to create directory: {}", dest.display()))?;
        copy_dir_contents(source, &dest)?;
    } else {
        fs::copy(source, &dest)
            .context(format!("Failed to copy {} to {}", source.display(), dest.display()))?;
    }
    Ok(dest)
}

fn copy_dir_contents(source: &Path, dest: &Path) -> Result<()> {
    for entry in
        fs::read_dir(source).context(format!("Failed to read directory: {}", source.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if path.is_dir() {
            fs::create_dir_all(&dest_path)
                .context(format!("Failed to create directory: {}", dest_path.display()))?;
            copy_dir_contents(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path).context(format!(
                "Failed to copy {} to {}",
                path.display(),
                dest_path.display()
            ))?;
        }
    }
    Ok(())
}

/// Read the pid recorded in `<instance_home>/config/pid`. A missing or
/// unreadable pid file means the instance is not running locally.
pub fn read_instance_pid(instance_home: &Path) -> Result<u32> {
    let pid_file = instance_home.join("config").join("pid");
    let content = fs::read_to_string(&pid_file)
        .context(format!("No pid file at {}", pid_file.display()))?;
    content
        .trim()
        .parse::<u32>()
        .context(format!("Invalid pid in {}", pid_file.display()))
}

/// Run a diagnostic `jcmd` command against a JVM pid, bounded by the
/// caller-supplied timeout, and return its stdout.
pub fn run_jcmd(pid: u32, args: &[&str], timeout: Duration) -> Result<String> {
    let mut command = Command::new("jcmd");
    command.arg(pid.to_string()).args(args);
    run_capture(command, timeout)
}

/// Spawn a command, capture its stdout, and kill it if it outlives the
/// deadline. A timed-out capture is a failure, never retried.
pub fn run_capture(mut command: Command, timeout: Duration) -> Result<String> {
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let program = command.get_program().to_string_lossy().to_string();
    let mut child = command
        .spawn()
        .context(format!("Failed to run '{}'", program))?;

    // Drain the pipes on threads so a large dump cannot block the child.
    let stdout_reader = spawn_pipe_reader(child.stdout.take());
    let stderr_reader = spawn_pipe_reader(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                kill_quietly(&mut child);
                bail!("'{}' timed out after {:?}", program, timeout);
            }
            None => thread::sleep(Duration::from_millis(50)),
        }
    };

    let stdout = stdout_reader
        .join()
        .unwrap_or_default();
    let stderr = stderr_reader
        .join()
        .unwrap_or_default();

    if !status.success() {
        let detail = stderr.trim();
        if detail.is_empty() {
            bail!("'{}' exited with {}", program, status);
        }
        bail!("'{}' failed: {}", program, detail);
    }
    Ok(stdout)
}

fn spawn_pipe_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buffer);
        }
        buffer
    })
}

fn kill_quietly(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Failed to kill timed-out process: {}", e);
    }
    let _ = child.wait();
}

/// Processes a live-capture collector should visit: the DAS when the run
/// covers the whole domain, then every in-scope instance in path order.
pub fn capture_targets(ctx: &CollectionContext) -> Vec<(String, PathBuf)> {
    let mut targets = Vec::new();
    if ctx.target_kind == TargetKind::Domain {
        targets.push((ctx.das_name.clone(), ctx.domain_root.clone()));
    }
    targets.extend(ctx.instance_homes.iter().cloned());
    targets
}
