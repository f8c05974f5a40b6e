mod error;
mod lexer;

#[cfg(test)]
mod tests;

pub use error::CompdbError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// JSON form of one compilation database record.
///
/// On input either `command` (shell-quoted string) or `arguments`
/// (pre-tokenized) may be present. Serialization always emits the
/// `arguments` form; `command` is never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub directory: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
}

/// One compilation-database entry: how a single translation unit is
/// compiled.
///
/// `arguments[0]` is the compiler executable; exactly one argument names
/// the main file. `main_file` may be absolute or relative to `directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationEntry {
    pub main_file: PathBuf,
    pub directory: PathBuf,
    pub arguments: Vec<String>,
}

impl CompilationEntry {
    /// Build an entry from its JSON record. Exactly one of `command` and
    /// `arguments` must be present.
    pub fn from_record(record: &EntryRecord) -> Result<Self, CompdbError> {
        let arguments = match (&record.command, &record.arguments) {
            (Some(command), None) => lexer::split_command(command)?,
            (None, Some(arguments)) => arguments.clone(),
            (Some(_), Some(_)) => {
                return Err(CompdbError::MalformedEntry(
                    "entry has both 'command' and 'arguments'".to_string(),
                ))
            }
            (None, None) => {
                return Err(CompdbError::MalformedEntry(
                    "entry has neither 'command' nor 'arguments'".to_string(),
                ))
            }
        };
        Ok(Self {
            main_file: PathBuf::from(&record.file),
            directory: PathBuf::from(&record.directory),
            arguments,
        })
    }

    /// Replace the main-file path everywhere it appears in the argument
    /// list, then record the new path.
    ///
    /// Matching is literal substring replacement. A compile command names
    /// its translation unit in exactly one argument and files rarely sit at
    /// the project root, so collisions like `cake.c` vs `dessert/cake.c`
    /// are unlikely in practice. An unrelated argument that does contain
    /// the same literal substring is rewritten too; known limitation.
    pub fn retarget_main_file(&mut self, new_path: &Path) {
        let old = self.main_file.to_string_lossy().into_owned();
        let new = new_path.to_string_lossy();
        for arg in &mut self.arguments {
            if arg.contains(old.as_str()) {
                *arg = arg.replace(old.as_str(), new.as_ref());
            }
        }
        self.main_file = new_path.to_path_buf();
    }

    /// Serializable form of this entry, as a defensive copy.
    pub fn to_record(&self) -> EntryRecord {
        EntryRecord {
            directory: self.directory.to_string_lossy().into_owned(),
            file: self.main_file.to_string_lossy().into_owned(),
            command: None,
            arguments: Some(self.arguments.clone()),
        }
    }
}

/// Load a compilation database that must contain exactly one entry.
///
/// Anything else is a usage error: the reducer works on one known-bad
/// translation unit at a time, and this check runs before any subprocess
/// is spawned.
pub fn load_single_entry(path: &Path) -> Result<CompilationEntry, CompdbError> {
    let text = fs::read_to_string(path)?;
    let records: Vec<EntryRecord> = serde_json::from_str(&text)?;
    if records.len() != 1 {
        return Err(CompdbError::MalformedEntry(format!(
            "expected compilation database to have 1 entry but found {}",
            records.len()
        )));
    }
    CompilationEntry::from_record(&records[0])
}
