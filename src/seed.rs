//! Bulk import of found items from a folder-per-category image tree.

use crate::{Engine, EngineError, ItemStore, OwnerId, Polarity, ReportRequest, Result};
use lostfound_core::Category;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

const COLORS: [&str; 8] = ["Blue", "Red", "Black", "White", "Silver", "Green", "Yellow", "Grey"];

const LOCATIONS: [&str; 7] = [
    "Library",
    "Gym",
    "Cafeteria",
    "Student Center",
    "Parking Lot",
    "Room 101",
    "Main Hall",
];

/// One subdirectory of an image tree and the images directly inside it.
#[derive(Debug, Clone)]
pub struct LabeledDir {
    pub label: String,
    pub files: Vec<PathBuf>,
}

/// Counts from a [`Engine::seed_dir`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub imported: usize,
    pub skipped: usize,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Walk the top-level subdirectories of `dir`, sorted by name, each with its
/// image files sorted by path.
pub fn labeled_image_dirs(dir: &Path) -> Result<Vec<LabeledDir>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(lostfound_core::Error::from)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut labeled = Vec::with_capacity(dirs.len());
    for path in dirs {
        let Some(label) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let mut files: Vec<PathBuf> = std::fs::read_dir(&path)
            .map_err(lostfound_core::Error::from)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|file| file.is_file() && is_image(file))
            .collect();
        files.sort();
        labeled.push(LabeledDir { label, files });
    }
    Ok(labeled)
}

/// First category whose name occurs in the folder name, ignoring case.
/// `"laptops_2023"` is a Laptop; anything unrecognised is Other.
pub fn category_for_folder(name: &str) -> Category {
    let name = name.to_lowercase();
    Category::ALL
        .into_iter()
        .find(|c| name.contains(&c.as_str().to_lowercase()))
        .unwrap_or(Category::Other)
}

/// Stock description for the `index`-th seeded image.
pub fn seed_description(category: Category, index: usize) -> String {
    format!(
        "Found a {} {} near the {}.",
        COLORS[index % COLORS.len()],
        category,
        LOCATIONS[index % LOCATIONS.len()]
    )
}

impl Engine {
    /// Report every image under `dir` as a found item, one subdirectory per
    /// category. Files that cannot be read or decoded are skipped.
    pub fn seed_dir(&self, store: &ItemStore, dir: &Path, owner: OwnerId, contact: &str) -> Result<SeedSummary> {
        let mut summary = SeedSummary::default();
        let mut index = 0;

        for LabeledDir { label, files } in labeled_image_dirs(dir)? {
            let category = category_for_folder(&label);
            info!("Seeding {} images from '{}' as {}", files.len(), label, category);

            for file in files {
                let bytes = match std::fs::read(&file) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Skipping {:?}: {}", file, e);
                        summary.skipped += 1;
                        continue;
                    }
                };
                let request = ReportRequest::new(owner, Polarity::Found, seed_description(category, index), contact)
                    .with_image(bytes, Some(file.display().to_string()))
                    .with_category(category);

                match self.report(store, request) {
                    Ok(_) => {
                        summary.imported += 1;
                        index += 1;
                    }
                    Err(EngineError::ImageUnreadable(e)) => {
                        warn!("Skipping {:?}: {}", file, e);
                        summary.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_for_folder() {
        assert_eq!(category_for_folder("Backpack"), Category::Backpack);
        assert_eq!(category_for_folder("laptops_2023"), Category::Laptop);
        assert_eq!(category_for_folder("WATERBOTTLE"), Category::Waterbottle);
        assert_eq!(category_for_folder("umbrellas"), Category::Other);
        // "Keyboard" is listed before "Keys"
        assert_eq!(category_for_folder("keyboard-keys"), Category::Keyboard);
    }

    #[test]
    fn test_seed_description_cycles() {
        assert_eq!(seed_description(Category::Keys, 0), "Found a Blue Keys near the Library.");
        assert_eq!(seed_description(Category::Mouse, 1), "Found a Red Mouse near the Gym.");
        assert_eq!(seed_description(Category::Mouse, 9), "Found a Red Mouse near the Cafeteria.");
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a/b.PNG")));
        assert!(is_image(Path::new("photo.jpeg")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("README")));
    }
}
