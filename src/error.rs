use std::path::PathBuf;

use thiserror::Error;

/// Fatal import preconditions. Everything in this enum terminates the
/// process when reached through [`App::import`](crate::App::import); each
/// cause carries its own exit code so launch scripts can tell them apart.
/// Per-asset decode failures are *not* errors; they degrade to defaults
/// with a logged warning.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no importer available for `{}`", path.display())]
    NoImporter { path: PathBuf },

    #[error("cannot open `{}`: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot load scene from `{}`: {source}", path.display())]
    InvalidScene { path: PathBuf, source: gltf::Error },
}

impl ImportError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ImportError::NoImporter { .. } => 2,
            ImportError::OpenFile { .. } => 3,
            ImportError::InvalidScene { .. } => 4,
        }
    }
}
