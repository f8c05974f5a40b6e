use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Main file {file} is not under the project root {root}")]
    OutsideProjectRoot { file: PathBuf, root: PathBuf },
}
