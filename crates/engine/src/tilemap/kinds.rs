use thiserror::Error;

/// Kinds that take part in solid-collision queries.
pub const PHYSICS_TILES: &[&str] = &["grass", "stone"];

/// Kinds whose variant is chosen by the auto-tile resolver.
pub const AUTO_TILE_TYPES: &[&str] = &["grass", "stone"];

pub fn is_physics_kind(kind: &str) -> bool {
    PHYSICS_TILES.contains(&kind)
}

pub fn is_auto_tile_kind(kind: &str) -> bool {
    AUTO_TILE_TYPES.contains(&kind)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileKindError {
    #[error("tile kind must not be empty")]
    Empty,
    #[error("tile kind must be a single path segment")]
    PathSeparator,
    #[error("tile kind must not contain '..'")]
    ParentTraversal,
    #[error("tile kind contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Kinds double as asset directory names, so they are restricted to a safe
/// single-segment alphabet.
pub fn validate_tile_kind(kind: &str) -> Result<(), TileKindError> {
    if kind.is_empty() {
        return Err(TileKindError::Empty);
    }
    if kind.contains('/') || kind.contains('\\') {
        return Err(TileKindError::PathSeparator);
    }
    if kind.contains("..") {
        return Err(TileKindError::ParentTraversal);
    }
    for ch in kind.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-') {
            continue;
        }
        return Err(TileKindError::InvalidCharacter { character: ch });
    }
    Ok(())
}
