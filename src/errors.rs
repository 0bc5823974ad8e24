//! Workflow error taxonomy and exit-code mapping.
//!
//! Mapping: NotFound io errors map to 127 (missing delegate binary),
//! delegated engine failures propagate their own status, usage-class errors
//! map to 2, everything else to 1.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum WorkflowError {
    /// Wrong argument count or shape for an override command.
    Usage(String),
    /// The build-context path does not resolve to an existing directory.
    NotADirectory(PathBuf),
    /// Unrecognized prune selection method token.
    UnknownSelectionMethod(String),
    /// Unrecognized run method token.
    UnknownRunMethod(String),
    /// The delegate engine reported failure; its exit status is propagated.
    Engine {
        action: &'static str,
        status: Option<i32>,
    },
    /// A captured engine query failed before producing usable output.
    Query(anyhow::Error),
    /// Elevation was required but no elevation program is available.
    Privilege(String),
    Io(io::Error),
}

impl WorkflowError {
    /// True for errors that should be accompanied by the command's long help.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            WorkflowError::Usage(_)
                | WorkflowError::NotADirectory(_)
                | WorkflowError::UnknownSelectionMethod(_)
                | WorkflowError::UnknownRunMethod(_)
        )
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            WorkflowError::Usage(_)
            | WorkflowError::NotADirectory(_)
            | WorkflowError::UnknownSelectionMethod(_)
            | WorkflowError::UnknownRunMethod(_) => 2,
            WorkflowError::Engine { status, .. } => {
                status.map_or(1, |c| if (1..=255).contains(&c) { c as u8 } else { 1 })
            }
            WorkflowError::Query(_) | WorkflowError::Privilege(_) => 1,
            WorkflowError::Io(e) => exit_code_for_io_error(e),
        }
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Usage(msg) => write!(f, "{msg}"),
            WorkflowError::NotADirectory(p) => write!(f, "not a directory: {}", p.display()),
            WorkflowError::UnknownSelectionMethod(t) => {
                write!(f, "unknown selection method {t:?} (expected all or old)")
            }
            WorkflowError::UnknownRunMethod(t) => write!(f, "unknown run method {t:?}"),
            WorkflowError::Engine {
                action,
                status: Some(c),
            } => write!(f, "{action} failed with status {c}"),
            WorkflowError::Engine {
                action,
                status: None,
            } => write!(f, "{action} terminated by signal"),
            WorkflowError::Query(e) => write!(f, "{e:#}"),
            WorkflowError::Privilege(msg) => write!(f, "{msg}"),
            WorkflowError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for WorkflowError {
    fn from(e: io::Error) -> Self {
        WorkflowError::Io(e)
    }
}

impl From<anyhow::Error> for WorkflowError {
    fn from(e: anyhow::Error) -> Self {
        WorkflowError::Query(e)
    }
}

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}
