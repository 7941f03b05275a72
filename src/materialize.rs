//! Writes one split of a class dataset to disk: copied images plus YOLO
//! label files.

use indicatif::ProgressBar;
use log::warn;
use std::collections::HashMap;
use std::fs::{copy, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::conversion::convert_bbox_coco2yolo;
use crate::error::Error;
use crate::types::{DerivedAnnotation, DerivedImage, RunStats};
use crate::utils::original_file_name;

/// Index a class's derived annotations by derived image id, preserving
/// their order.
pub fn annotations_by_image<'a>(
    annotations: &'a [DerivedAnnotation],
) -> HashMap<&'a str, Vec<&'a DerivedAnnotation>> {
    let mut map: HashMap<&str, Vec<&DerivedAnnotation>> = HashMap::new();
    for ann in annotations {
        map.entry(ann.image_id.as_str()).or_default().push(ann);
    }
    map
}

/// Copy the images of one split and write their label files.
///
/// The source path is recovered by stripping the `_{class}` suffix from the
/// derived file name. A missing source file skips the image entirely. An
/// image without annotations is still copied but gets no label file; images
/// only enter a class because of a qualifying annotation, so that branch is
/// only reachable on malformed input.
#[allow(clippy::too_many_arguments)]
pub fn materialize_split(
    split_images: &[DerivedImage],
    class_name: &str,
    source_image_dir: &Path,
    images_dir: &Path,
    labels_dir: &Path,
    anns_by_image: &HashMap<&str, Vec<&DerivedAnnotation>>,
    clamp: bool,
    stats: &mut RunStats,
    pb: &ProgressBar,
) -> Result<(), Error> {
    for image in split_images {
        pb.inc(1);

        let Some(original_name) = original_file_name(&image.file_name, class_name) else {
            warn!(
                "Cannot recover source name from {:?} for class {:?}; skipping",
                image.file_name, class_name
            );
            stats.missing_images += 1;
            continue;
        };

        let source_path = source_image_dir.join(&original_name);
        if !source_path.exists() {
            warn!("Missing image: {}", source_path.display());
            stats.missing_images += 1;
            continue;
        }

        copy(&source_path, images_dir.join(&image.file_name))?;
        stats.images_copied += 1;

        let Some(anns) = anns_by_image.get(image.id.as_str()) else {
            continue;
        };

        let label_path = labels_dir
            .join(Path::new(&image.file_name).file_stem().unwrap_or_default())
            .with_extension("txt");
        let mut writer = BufWriter::new(File::create(&label_path)?);
        for ann in anns {
            let mut bbox = convert_bbox_coco2yolo(ann.bbox, image.width, image.height)?;
            if clamp {
                bbox = bbox.clamped();
            }
            writeln!(writer, "{}", bbox.to_label_line())?;
        }
        writer.flush()?;
        stats.label_files_written += 1;
    }

    Ok(())
}
