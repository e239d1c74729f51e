/// Error types for the engine and level loading.

use thiserror::Error;

use crate::domain::tile::Tile;

/// Unrecoverable engine faults. Any of these stops every actor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A ghost remembers an actor marker as the tile beneath it.
    /// The grid can no longer be trusted.
    #[error("ghost {ghost} holds corrupt vacated tile {tile:?}")]
    CorruptVacatedTile { ghost: usize, tile: Tile },

    /// An actor thread panicked while holding the grid lock.
    #[error("grid lock poisoned")]
    LockPoisoned,

    #[error("no ghost with id {0}")]
    UnknownGhost(usize),
}

/// Problems with a maze layout file.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read maze file: {0}")]
    Io(#[from] std::io::Error),

    #[error("maze must be {expected_w}x{expected_h}, got {width}x{height}")]
    WrongDimensions {
        expected_w: usize,
        expected_h: usize,
        width: usize,
        height: usize,
    },

    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("maze has no player start")]
    MissingPlayer,

    #[error("maze has a second player start at ({x}, {y})")]
    ExtraPlayer { x: usize, y: usize },

    #[error("maze has no ghost starts")]
    NoGhosts,
}
