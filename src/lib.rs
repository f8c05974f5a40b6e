// Public API exports
pub mod compdb;
pub mod flags;
pub mod oracle;
pub mod reduce;
pub mod relocate;

// Re-export main types for convenience
pub use compdb::{load_single_entry, CompdbError, CompilationEntry, EntryRecord};
pub use flags::{classify, FlagMatch, PathFlagRule};
pub use oracle::{reproduces, WORKER_MODE};
pub use reduce::{ReduceError, ReductionSession};
pub use relocate::{relocate_entry, DiskProbe, PathProbe, RelocateError};
