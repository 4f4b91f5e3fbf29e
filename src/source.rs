//! Where rendered results pages come from.

use crate::data_structs::DepartmentSelection;
use crate::error::*;
use std::fs;
use std::path::PathBuf;

/// Anything able to show the results page for a department and hand back its
/// HTML once the page has settled.
///
/// Implementations own navigation, selection and waiting. They must not
/// return until the department's figures are in place, and must fail with
/// `NavigationOrRenderFailure` when that doesn't happen in time.
pub trait DocumentSource {
    fn settled_document(&self, department: &DepartmentSelection) -> Result<String>;
}

/// A results page saved to disk earlier.
///
/// The department is assumed to already be selected in the snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf
}

impl SnapshotSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        SnapshotSource {
            path: path.into()
        }
    }
}

impl DocumentSource for SnapshotSource {
    fn settled_document(&self, department: &DepartmentSelection) -> Result<String> {
        info!(path = %self.path.display(), department = department.name.as_str(), "reading snapshot");

        fs::read_to_string(&self.path).chain_err(|| {
            ErrorKind::NavigationOrRenderFailure(format!("cannot read snapshot {}", self.path.display()))
        })
    }
}
