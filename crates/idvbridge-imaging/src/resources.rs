// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bundled branding resources, looked up by bare name.

use std::path::PathBuf;

/// File extensions tried, in order, when looking up a resource name.
pub const RESOURCE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// A directory of image resources addressed by file stem (`brand_logo` →
/// `brand_logo.png`).
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    root: PathBuf,
}

impl ResourceCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every path a resource name may live at, in lookup order.
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        RESOURCE_EXTENSIONS
            .iter()
            .map(move |ext| self.root.join(format!("{name}.{ext}")))
    }

    /// First existing file for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.candidates(name).find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_png_then_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.jpg"), b"jpg").unwrap();
        let catalog = ResourceCatalog::new(dir.path());
        assert_eq!(catalog.lookup("logo"), Some(dir.path().join("logo.jpg")));

        std::fs::write(dir.path().join("logo.png"), b"png").unwrap();
        assert_eq!(catalog.lookup("logo"), Some(dir.path().join("logo.png")));
        assert_eq!(catalog.lookup("absent"), None);
    }
}
