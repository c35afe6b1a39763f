//! Pre-render include list handling.
//!
//! The pre-render tool reads its list of routes from a field in a JSON
//! configuration file that is committed to the repository (by default
//! `reactSnap.include` in `package.json`). A run therefore has to:
//!
//! 1. snapshot the file,
//! 2. write the freshly crawled route list into the field,
//! 3. run the pre-render command,
//! 4. put the file back exactly as it was, whatever happened in step 3,
//!    Ctrl-C included.
//!
//! [`ConfigSnapshot`] owns step 1 and 4: it restores on [`ConfigSnapshot::restore`]
//! or, failing that, when dropped. [`run_with_include_list`] strings the four
//! steps together.

use crate::emit::write_output;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Original bytes of a config file, restored on drop.
#[derive(Debug)]
#[must_use = "dropping the snapshot immediately restores the file"]
pub struct ConfigSnapshot {
    path: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl ConfigSnapshot {
    /// Read and remember the current contents of `path`.
    pub fn capture(path: &Path) -> Result<Self> {
        let original = fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("pre-render config '{}' does not exist", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            original,
            restored: false,
        })
    }

    /// The file this snapshot guards.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the original bytes back.
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.write_back()
    }

    fn write_back(&self) -> Result<()> {
        fs::write(&self.path, &self.original).map_err(|source| Error::Output {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for ConfigSnapshot {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(e) = self.write_back() {
                warn!(path = %self.path.display(), error = %e, "failed to restore pre-render config");
            }
        }
    }
}

/// Set a dotted field (such as `reactSnap.include`) in a JSON document.
///
/// Intermediate objects are created when missing. Fails when the document or
/// an intermediate value is not an object.
///
/// ```
/// use serde_json::json;
/// use sitegen_core::prerender::set_field;
///
/// let mut doc = json!({"name": "site"});
/// set_field(&mut doc, "reactSnap.include", json!(["/"])).unwrap();
/// assert_eq!(doc["reactSnap"]["include"], json!(["/"]));
/// ```
pub fn set_field(document: &mut Value, field: &str, value: Value) -> Result<()> {
    let mut keys: Vec<&str> = field.split('.').collect();
    let Some(last) = keys.pop().filter(|k| !k.is_empty()) else {
        return Err(Error::Config(format!("invalid include field '{field}'")));
    };

    let mut current = document
        .as_object_mut()
        .ok_or_else(|| Error::Parse("pre-render config is not a JSON object".to_string()))?;
    for key in keys {
        if key.is_empty() {
            return Err(Error::Config(format!("invalid include field '{field}'")));
        }
        current = current
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| Error::Parse(format!("'{key}' in '{field}' is not a JSON object")))?;
    }
    current.insert(last.to_string(), value);
    Ok(())
}

/// Write `paths` into `field` of the JSON file at `path`.
pub fn write_include_list(path: &Path, field: &str, paths: &[String]) -> Result<()> {
    let raw = fs::read_to_string(path)?;
    let mut document: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::Parse(format!("{} is not valid JSON: {e}", path.display())))?;
    set_field(&mut document, field, Value::from(paths.to_vec()))?;

    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');
    write_output(path, &rendered)
}

/// Exit code reported when the run is interrupted with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Run the pre-render command with inherited stdio.
///
/// A non-zero exit, or a failure to start the program, becomes
/// [`Error::Subprocess`]. Ctrl-C kills the child and returns
/// [`Error::Subprocess`] with code 130, so callers still get to clean up.
#[instrument(skip_all, fields(program = command.first().map_or("", String::as_str)))]
pub async fn run_command(command: &[String], working_dir: Option<&Path>) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Err(Error::Config("pre-render command is empty".to_string()));
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|e| {
        warn!(error = %e, "failed to start pre-render command");
        Error::Subprocess {
            program: program.clone(),
            code: None,
        }
    })?;

    let status = tokio::select! {
        status = child.wait() => status?,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("interrupted, stopping pre-render command");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill pre-render command");
            }
            return Err(Error::Subprocess {
                program: program.clone(),
                code: Some(INTERRUPTED_EXIT_CODE),
            });
        },
    };

    if !status.success() {
        warn!(exit_code = ?status.code(), "pre-render command failed");
        return Err(Error::Subprocess {
            program: program.clone(),
            code: status.code(),
        });
    }
    Ok(())
}

/// Snapshot `config_path`, inject `paths` into `field`, run `command`, restore.
///
/// The original file content is back in place when this returns, on success
/// and on every error path. A subprocess failure takes precedence over a
/// restore failure in the returned error.
pub async fn run_with_include_list(
    config_path: &Path,
    field: &str,
    paths: &[String],
    command: &[String],
) -> Result<()> {
    let snapshot = ConfigSnapshot::capture(config_path)?;

    // The snapshot's Drop restores the file if either step bails out early.
    write_include_list(config_path, field, paths)?;
    info!(
        config = %config_path.display(),
        field,
        routes = paths.len(),
        "include list written"
    );

    let working_dir = config_path.parent().filter(|p| !p.as_os_str().is_empty());
    let outcome = run_command(command, working_dir).await;
    let restored = snapshot.restore();

    outcome?;
    restored?;
    info!(config = %config_path.display(), "pre-render config restored");
    Ok(())
}
