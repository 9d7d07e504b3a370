use std::fs;
use std::path::Path;

use pose_core::model::{ImageName, ImageOrder};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::repository::StorageError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Image files directly inside `dir`, sorted by name and then ordered per `order`.
///
/// Subdirectories and non-image files are skipped.
///
/// # Errors
///
/// Returns `StorageError::Io` if the directory cannot be read.
pub fn list_images(dir: &Path, order: ImageOrder) -> Result<Vec<ImageName>, StorageError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !is_image(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(ImageName::new(name));
        } else {
            log::warn!("skipping non UTF-8 file name {}", path.display());
        }
    }
    names.sort();

    if let ImageOrder::Shuffled { seed } = order {
        let mut rng = StdRng::seed_from_u64(seed);
        names.shuffle(&mut rng);
    }

    log::debug!("found {} images in {}", names.len(), dir.display());
    Ok(names)
}
