// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Static asset copying.

use crate::error::{Error, Result};
use diagnostics::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use wax::Glob;

/// Copy the regular files under `assets_dir` matched by any of `patterns`
/// into `dest`, keeping their relative paths. Returns the number copied.
///
/// Files matched by several patterns are copied once; copies happen in path
/// order. A missing assets directory copies nothing.
pub fn copy_assets(assets_dir: &Path, patterns: &[String], dest: &Path) -> Result<usize> {
    if !assets_dir.is_dir() {
        let dir = assets_dir.display().to_string();
        warn!("Assets directory {dir} not found; no assets copied", dir: dir);
        return Ok(0);
    }

    let matched = matching_files(assets_dir, patterns)?;

    for relpath in &matched {
        let from = assets_dir.join(relpath);
        let to = dest.join(relpath);
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
    }

    let count = matched.len();
    debug!("Copied {count} assets", count: count);
    Ok(count)
}

fn matching_files(assets_dir: &Path, patterns: &[String]) -> Result<BTreeSet<PathBuf>> {
    let mut matched = BTreeSet::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| Error::Assets {
            message: format!("invalid pattern '{}': {}", pattern, e),
        })?;

        for entry in glob.walk(assets_dir) {
            let entry = entry.map_err(|e| Error::Assets {
                message: format!("walking {}: {}", assets_dir.display(), e),
            })?;

            let fullpath = entry.path();
            let md = std::fs::metadata(fullpath).map_err(|e| Error::io(fullpath, e))?;
            if !md.is_file() {
                continue;
            }

            let relpath = fullpath.strip_prefix(assets_dir).map_err(|_| Error::Assets {
                message: format!("{} is outside {}", fullpath.display(), assets_dir.display()),
            })?;
            matched.insert(relpath.to_path_buf());
        }
    }
    Ok(matched)
}
