mod error;


pub use error::ReduceError;

use crate::compdb::CompilationEntry;
use crate::oracle::{self, WORKER_MODE};
use crate::relocate::{relocate_entry, DiskProbe, RelocateError};
use anyhow::Context;
use log::{info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{Builder, NamedTempFile};

/// One bug-reduction run. Owns the entry being reduced and, once `run`
/// creates it, the sandbox directory the minimizer works in.
///
/// The whole pipeline is sequential and blocking: preprocessing, the
/// oracle check, sandbox construction, and the minimizer invocation run
/// one after another, and a hang in any external process hangs the run
/// (no driver-side timeout).
pub struct ReductionSession {
    pub entry: CompilationEntry,
    pub indexer: PathBuf,
    pub minimizer: PathBuf,
    pub project_root: PathBuf,
    pub failure_pattern: Regex,
    pub extra_args: Vec<String>,
}

impl ReductionSession {
    /// Produce the minimization seed file in the project root.
    ///
    /// Preprocessed output is preferred because it gives the minimizer a
    /// much smaller search space. If the failure does not reproduce on it,
    /// fall back to the original source with a warning: preprocessing can
    /// make defects that are sensitive to file or macro boundaries
    /// disappear. The fallback is best-effort, never an abort, since the
    /// person running this already suspects a real bug.
    pub fn prepare_seed(&self) -> Result<NamedTempFile, ReduceError> {
        let stem = self
            .entry
            .main_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tu".to_string());
        let ext = self
            .entry
            .main_file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let seed = Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(&format!(".min{ext}"))
            .tempfile_in(&self.project_root)
            .context("Failed to create seed file in project root")?;

        preprocess(&self.entry, seed.path())?;

        let mut probe_entry = self.entry.clone();
        probe_entry.retarget_main_file(seed.path());
        let probe_compdb = Builder::new()
            .prefix("compile_commands-")
            .suffix(".json")
            .tempfile_in(&self.project_root)
            .context("Failed to create probe compilation database")?;
        serde_json::to_writer(probe_compdb.as_file(), &[probe_entry.to_record()])
            .context("Failed to write probe compilation database")?;

        if oracle::reproduces(&self.indexer, probe_compdb.path(), &self.failure_pattern)? {
            info!("reproduced problem with preprocessed file");
        } else {
            warn!("could not reproduce error with preprocessed output; will try to minimize original file");
            let original = if self.entry.main_file.is_absolute() {
                self.entry.main_file.clone()
            } else {
                self.entry.directory.join(&self.entry.main_file)
            };
            fs::copy(&original, seed.path()).with_context(|| {
                format!("Failed to copy original source {}", original.display())
            })?;
        }
        Ok(seed)
    }

    /// Drive the external minimizer against `seed_path`.
    ///
    /// Materializes the sandbox (relocated entry, one-entry compilation
    /// database, executable verification script), then blocks until the
    /// minimizer exits; the minimizer mutates its copy of the seed in
    /// place across iterations. A nonzero minimizer exit becomes
    /// `MinimizerFailure` with the code preserved, no retry.
    ///
    /// The sandbox directory is never deleted; its path is logged so the
    /// reduced artifact and verification script stay inspectable.
    pub fn run(mut self, seed_path: &Path) -> Result<(), ReduceError> {
        let rel_seed = seed_path
            .strip_prefix(&self.project_root)
            .map_err(|_| RelocateError::OutsideProjectRoot {
                file: seed_path.to_path_buf(),
                root: self.project_root.clone(),
            })?
            .to_path_buf();

        self.entry.retarget_main_file(&rel_seed);
        let mut entry = relocate_entry(&self.entry, &self.project_root, &DiskProbe)?;

        let sandbox = Builder::new()
            .prefix("tu-reduce-")
            .tempdir()
            .context("Failed to create sandbox directory")?
            .keep();
        entry.directory = sandbox.clone();

        let seed_copy = sandbox.join(&entry.main_file);
        if let Some(parent) = seed_copy.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::copy(seed_path, &seed_copy)
            .with_context(|| format!("Failed to copy seed into {}", sandbox.display()))?;

        let compdb_path = sandbox.join("compile_commands.json");
        let compdb_file = fs::File::create(&compdb_path)
            .with_context(|| format!("Failed to create {}", compdb_path.display()))?;
        serde_json::to_writer(compdb_file, &[entry.to_record()])
            .context("Failed to write sandbox compilation database")?;

        let run_sh = sandbox.join("run.sh");
        write_verification_script(&run_sh, &self.indexer, &compdb_path, &self.failure_pattern)?;

        info!("sandbox directory persisted at {}", sandbox.display());

        let status = Command::new(&self.minimizer)
            .arg(&run_sh)
            .arg(&entry.main_file)
            .args(&self.extra_args)
            .current_dir(&sandbox)
            .status()
            .with_context(|| format!("Failed to run minimizer {}", self.minimizer.display()))?;
        if !status.success() {
            return Err(ReduceError::MinimizerFailure {
                code: status.code().unwrap_or(1),
            });
        }
        Ok(())
    }
}

/// Run the entry's own compile command in preprocess-only mode, writing
/// the flattened (macro-expanded, include-free) translation unit to
/// `output`. A broken original command cannot be fixed here, so a nonzero
/// exit is fatal with no fallback.
fn preprocess(entry: &CompilationEntry, output: &Path) -> Result<(), ReduceError> {
    let (compiler, rest) = entry
        .arguments
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("entry has an empty argument list"))?;
    let status = Command::new(compiler)
        .args(rest)
        .arg("-E")
        .arg("-o")
        .arg(output)
        .current_dir(&entry.directory)
        .status()
        .with_context(|| format!("Failed to run preprocessor {compiler}"))?;
    if !status.success() {
        return Err(ReduceError::PreprocessFailure { status });
    }
    Ok(())
}

/// Write the interestingness predicate the minimizer will invoke on every
/// candidate: run the indexer against the sandbox database, then grep the
/// combined log for the failure pattern. Exit code zero means the bug is
/// still present.
fn write_verification_script(
    path: &Path,
    indexer: &Path,
    compdb_path: &Path,
    pattern: &Regex,
) -> Result<(), ReduceError> {
    let script = format!(
        "#!/usr/bin/env bash\n\
         {indexer} --worker-mode={mode} --compdb-path={compdb} > out.log 2>&1\n\
         set -e\n\
         grep -E '{pattern}' out.log\n",
        indexer = indexer.display(),
        mode = WORKER_MODE,
        compdb = compdb_path.display(),
        pattern = pattern.as_str(),
    );
    fs::write(path, script).with_context(|| format!("Failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to chmod {}", path.display()))?;
    }
    Ok(())
}
