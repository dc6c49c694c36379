use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where each generated image goes in the book.
///
/// The first image is always the cover. Interior image `i` (1-based among
/// the remaining images) lands on page position `min(page_count, 2 * i)`;
/// a later image replaces an earlier one on the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePlacement {
    pub cover: Option<PathBuf>,
    /// Keyed by 1-based page position.
    pub interior: BTreeMap<usize, PathBuf>,
}

impl ImagePlacement {
    pub fn assign(images: &[PathBuf], page_count: usize) -> Self {
        let Some((cover, rest)) = images.split_first() else {
            return Self::default();
        };

        let interior = rest
            .iter()
            .enumerate()
            .map(|(i, image)| (page_count.min(2 * (i + 1)), image.clone()))
            .collect();

        Self {
            cover: Some(cover.clone()),
            interior,
        }
    }

    pub fn image_for_page(&self, position: usize) -> Option<&PathBuf> {
        self.interior.get(&position)
    }
}
