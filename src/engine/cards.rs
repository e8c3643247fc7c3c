//! Card images loaded from a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use super::sprite::{PlacedSprite, SpriteKind};
use crate::error::{EngineError, Result};
use crate::types::Point;
use crate::viewport::Viewport;

/// Every file under `root`, depth first, in the order the filesystem
/// reports them. Pass `sorted` to order each directory by name instead.
pub fn card_paths(root: &Path, sorted: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk(root, sorted, &mut out)?;
    Ok(out)
}

fn walk(dir: &Path, sorted: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source| EngineError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|e| e.and_then(|e| Ok((e.path(), e.file_type()?))))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(io_err)?;
    if sorted {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
    }
    // Linked directories are not followed.
    for (path, file_type) in entries {
        if file_type.is_dir() {
            walk(&path, sorted, out)?;
        } else if file_type.is_symlink() && !path.is_file() {
            log::debug!("skipping linked directory {}", path.display());
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Decode and rescale every card under `root`. Each card's id is its file
/// stem; its tag is the sub-directory it lives in (empty at the root).
pub fn load_cards(root: &Path, sorted: bool, viewport: &Viewport) -> Result<Vec<PlacedSprite>> {
    let paths = card_paths(root, sorted)?;
    let mut cards = Vec::with_capacity(paths.len());
    for path in paths {
        let image = image::open(&path)
            .map_err(|source| EngineError::FatalAsset {
                path: path.clone(),
                source,
            })?
            .into_rgba8();
        let image = viewport.rescale(&image);

        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tag = path
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        cards.push(PlacedSprite::new(
            id,
            Point::default(),
            image,
            SpriteKind::Card { tag, source: path },
        ));
    }
    log::info!("{} cards loaded from {}", cards.len(), root.display());
    Ok(cards)
}
