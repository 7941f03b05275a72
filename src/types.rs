//! Typed COCO records and the derived per-class records built during
//! partitioning.
//!
//! Unknown fields on images and annotations are kept in a flattened map so
//! they survive into the per-class COCO snapshot untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// A COCO image record. `extra` carries any fields beyond the ones this
/// tool reads (license, date_captured, ...) through to the output snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A COCO annotation record with an absolute-pixel, top-left-origin bbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    pub image_id: i64,
    pub category_id: i64,
    pub bbox: [f64; 4],
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A COCO category. Only the id is referenced; the original name is
/// discarded once categories are merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// The single synthetic category carried by every per-class snapshot.
    pub fn synthetic(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            extra: Map::new(),
        }
    }
}

/// Top-level COCO annotation file.
#[derive(Debug, Clone, Deserialize)]
pub struct CocoFile {
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CocoFile {
    /// Reject any image record with a zero dimension before output is
    /// written; a zero width or height would poison every bbox conversion
    /// downstream.
    pub fn validate_dimensions(&self) -> Result<(), Error> {
        for image in &self.images {
            if image.width == 0 || image.height == 0 {
                return Err(Error::InvalidImageDimensions {
                    id: image.id,
                    width: image.width,
                    height: image.height,
                });
            }
        }
        Ok(())
    }
}

/// A per-merged-class copy of an original image record. The id and file
/// name both carry a `_{class}` suffix so the same source image can appear
/// independently in several class datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedImage {
    pub id: String,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An annotation re-pointed at a derived image. The original category id is
/// kept for the snapshot even though every label file uses class index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedAnnotation {
    pub id: i64,
    pub image_id: String,
    pub category_id: i64,
    pub bbox: [f64; 4],
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The COCO-shaped snapshot written per merged class.
#[derive(Debug, Serialize)]
pub struct ClassSnapshot<'a> {
    pub images: &'a [DerivedImage],
    pub annotations: &'a [DerivedAnnotation],
    pub categories: Vec<Category>,
}

// Counters reported at the end of a run.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub classes_written: usize,
    pub images_copied: usize,
    pub missing_images: usize,
    pub label_files_written: usize,
    pub annotations_dropped: usize,
    pub images_truncated: usize,
}

impl RunStats {
    pub fn print_summary(&self) {
        log::info!("=== Run Summary ===");
        log::info!("Class datasets written: {}", self.classes_written);
        log::info!("Images copied: {}", self.images_copied);
        log::info!("Label files written: {}", self.label_files_written);

        if self.annotations_dropped > 0 {
            log::warn!(
                "Annotations dropped (category not in merge map): {}",
                self.annotations_dropped
            );
        }
        if self.missing_images > 0 {
            log::warn!(
                "Images skipped (source file missing): {}",
                self.missing_images
            );
        }
        if self.images_truncated > 0 {
            log::warn!(
                "Images not assigned to any split (test split disabled): {}",
                self.images_truncated
            );
        }
    }
}
