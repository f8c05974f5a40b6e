use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReduceError {
    #[error(transparent)]
    Compdb(#[from] crate::compdb::CompdbError),

    #[error(transparent)]
    Relocate(#[from] crate::relocate::RelocateError),

    #[error("Preprocessing failed: {status}")]
    PreprocessFailure { status: std::process::ExitStatus },

    #[error("Minimizer exited with code {code}")]
    MinimizerFailure { code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
