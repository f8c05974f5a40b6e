mod error;


pub use error::RelocateError;

use crate::compdb::CompilationEntry;
use crate::flags::{classify, FlagMatch};
use log::debug;
use std::path::{Path, PathBuf};

/// Filesystem existence, abstracted so the normalizer can be tested
/// against a fake filesystem.
pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
pub struct DiskProbe;

impl PathProbe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Rewrite an entry's paths so the compile command stays valid when run
/// from a brand-new working directory containing only the main file.
///
/// Returns a new entry; the input is not touched. The external minimizer
/// creates its own scratch directories, so every path except the main
/// file must survive a change of working directory:
/// - path-flag values become absolute, resolved against the entry's
///   original working directory, but only if the resolved path exists
///   (a token that merely looks like a path is left alone);
/// - the main-file argument becomes relative to `project_root`.
///
/// Idempotent on an already-relocated entry whose absolute paths exist.
pub fn relocate_entry(
    entry: &CompilationEntry,
    project_root: &Path,
    probe: &dyn PathProbe,
) -> Result<CompilationEntry, RelocateError> {
    let main_file = if entry.main_file.is_absolute() {
        entry
            .main_file
            .strip_prefix(project_root)
            .map_err(|_| RelocateError::OutsideProjectRoot {
                file: entry.main_file.clone(),
                root: project_root.to_path_buf(),
            })?
            .to_path_buf()
    } else {
        entry.main_file.clone()
    };
    let main_str = main_file.to_string_lossy();

    let mut arguments = Vec::with_capacity(entry.arguments.len());
    let mut fix_next = false;
    for arg in &entry.arguments {
        if fix_next {
            // Value token of the preceding separate-value flag.
            fix_next = false;
            arguments.push(fix_path(arg, &entry.directory, probe));
            continue;
        }
        if arg.contains(main_str.as_ref()) {
            // The main-file argument: collapse an absolute spelling to the
            // relative path, leave any other spelling alone.
            if Path::new(arg).is_absolute() {
                arguments.push(main_str.clone().into_owned());
            } else {
                arguments.push(arg.clone());
            }
            continue;
        }
        match classify(arg) {
            FlagMatch::FusedValue { value, .. } if !value.is_empty() => {
                let prefix = &arg[..arg.len() - value.len()];
                arguments.push(format!("{}{}", prefix, fix_path(&value, &entry.directory, probe)));
            }
            FlagMatch::SeparateValue => {
                fix_next = true;
                arguments.push(arg.clone());
            }
            FlagMatch::FusedValue { .. } | FlagMatch::NotAPath => {
                arguments.push(arg.clone());
            }
        }
    }

    Ok(CompilationEntry {
        main_file,
        directory: entry.directory.clone(),
        arguments,
    })
}

/// Existence-gated resolution: a relative value is made absolute against
/// the entry's original working directory only when the result exists on
/// the probed filesystem.
fn fix_path(value: &str, directory: &Path, probe: &dyn PathProbe) -> String {
    if Path::new(value).is_absolute() {
        return value.to_string();
    }
    let resolved: PathBuf = directory.join(value);
    if probe.exists(&resolved) {
        return resolved.to_string_lossy().into_owned();
    }
    // Maybe it wasn't a path argument after all.
    debug!(
        "leaving '{}' unchanged: {} does not exist",
        value,
        resolved.display()
    );
    value.to_string()
}
