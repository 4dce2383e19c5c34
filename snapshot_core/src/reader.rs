//! Boundary to the process-memory reader.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use snapshot_schema::GameState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read capture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse capture {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("process read failed: {0}")]
    Process(String),
}

/// Produces one [`GameState`] per call.
///
/// Implementations may block while reading process memory; the builder runs
/// them on a blocking worker under a timeout. A state with no live or area
/// half means no game is running.
pub trait GameStateReader: Send + Sync {
    fn read_game_state(&self) -> Result<GameState, ReadError>;
}

impl<F> GameStateReader for F
where
    F: Fn() -> Result<GameState, ReadError> + Send + Sync,
{
    fn read_game_state(&self) -> Result<GameState, ReadError> {
        self()
    }
}

/// Reader used when nothing is attached: every call reports no active game.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGameReader;

impl GameStateReader for NoGameReader {
    fn read_game_state(&self) -> Result<GameState, ReadError> {
        Ok(GameState::default())
    }
}

/// Re-reads a JSON capture on every call. A missing file means no game.
#[derive(Debug, Clone)]
pub struct CaptureFileReader {
    path: PathBuf,
}

impl CaptureFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GameStateReader for CaptureFileReader {
    fn read_game_state(&self) -> Result<GameState, ReadError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(GameState::default()),
            Err(source) => {
                return Err(ReadError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents).map_err(|source| ReadError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
