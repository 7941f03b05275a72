//! Split allocation and the end-to-end pipeline.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;

use crate::config::Args;
use crate::io::{read_coco_file, setup_class_directories, write_class_manifest, write_coco_snapshot};
use crate::materialize::{annotations_by_image, materialize_split};
use crate::merge::MergeConfig;
use crate::partition::partition_by_class;
use crate::types::{DerivedImage, RunStats};
use crate::utils::create_progress_bar;

/// Train/validation fractions. They need not sum to 1.0; the remainder
/// after both cuts goes to the test split when enabled.
#[derive(Debug, Clone, Copy)]
pub struct SplitRatio {
    pub train: f64,
    pub val: f64,
}

/// A class's derived images dealt into splits. `dropped` counts images
/// beyond the train/val cuts when no test split takes the remainder.
#[derive(Debug)]
pub struct SplitSets {
    pub train: Vec<DerivedImage>,
    pub val: Vec<DerivedImage>,
    pub test: Option<Vec<DerivedImage>>,
    pub dropped: usize,
}

/// Shuffle the derived image list and cut it by ratio:
/// `train = [0, floor(train*n))`, `val` the next `floor(val*n)` items.
/// With the test split disabled the remainder is dropped, matching the
/// original tool; the caller surfaces the loss through `dropped`.
pub fn split_images(
    mut images: Vec<DerivedImage>,
    ratio: SplitRatio,
    include_test: bool,
    rng: &mut impl Rng,
) -> SplitSets {
    images.shuffle(rng);

    let n = images.len();
    let train_len = ((ratio.train * n as f64).floor() as usize).min(n);
    let val_len = ((ratio.val * n as f64).floor() as usize).min(n - train_len);

    let mut val = images.split_off(train_len);
    let remainder = val.split_off(val_len);
    let train = images;

    if include_test {
        SplitSets {
            train,
            val,
            test: Some(remainder),
            dropped: 0,
        }
    } else {
        SplitSets {
            train,
            val,
            test: None,
            dropped: remainder.len(),
        }
    }
}

/// Run the whole pipeline: parse, partition per merged class, split, and
/// materialize each class dataset under the output root.
pub fn process_dataset(args: &Args) -> Result<RunStats, crate::error::Error> {
    let merge_config = MergeConfig::load(&args.merge_config)?;

    info!("Reading {}", args.coco_json.display());
    let coco = read_coco_file(&args.coco_json)?;
    coco.validate_dimensions()?;

    let merged_map = merge_config.resolve();
    let mut stats = RunStats::default();
    let subsets = partition_by_class(
        &coco,
        &merged_map,
        merge_config.class_names(),
        &mut stats,
    );
    info!(
        "Partitioned {} images / {} annotations into {} merged classes",
        coco.images.len(),
        coco.annotations.len(),
        subsets.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let ratio = SplitRatio {
        train: args.train_size,
        val: args.val_size,
    };

    for (class_name, subset) in &subsets {
        let dirs = setup_class_directories(&args.output_dir, class_name, args.include_test)?;
        write_class_manifest(&dirs.root, class_name)?;

        let splits = split_images(subset.images.clone(), ratio, args.include_test, &mut rng);
        if splits.dropped > 0 {
            warn!(
                "{}: {} images past the train/val cut were not assigned to any split",
                class_name, splits.dropped
            );
            stats.images_truncated += splits.dropped;
        }
        info!(
            "{}: {} source images -> {} train / {} val{}",
            class_name,
            subset.source_image_ids.len(),
            splits.train.len(),
            splits.val.len(),
            splits
                .test
                .as_ref()
                .map(|t| format!(" / {} test", t.len()))
                .unwrap_or_default()
        );

        let anns_by_image = annotations_by_image(&subset.annotations);
        let total = splits.train.len()
            + splits.val.len()
            + splits.test.as_ref().map_or(0, Vec::len);
        let pb = create_progress_bar(total as u64, class_name);

        materialize_split(
            &splits.train,
            class_name,
            &args.image_dir,
            &dirs.train_images_dir,
            &dirs.train_labels_dir,
            &anns_by_image,
            args.clamp,
            &mut stats,
            &pb,
        )?;
        materialize_split(
            &splits.val,
            class_name,
            &args.image_dir,
            &dirs.val_images_dir,
            &dirs.val_labels_dir,
            &anns_by_image,
            args.clamp,
            &mut stats,
            &pb,
        )?;
        if let (Some(test_images_dir), Some(test_labels_dir), Some(test_images)) = (
            &dirs.test_images_dir,
            &dirs.test_labels_dir,
            &splits.test,
        ) {
            materialize_split(
                test_images,
                class_name,
                &args.image_dir,
                test_images_dir,
                test_labels_dir,
                &anns_by_image,
                args.clamp,
                &mut stats,
                &pb,
            )?;
        }
        pb.finish_with_message(format!("{} complete", class_name));

        write_coco_snapshot(&dirs.root, class_name, &subset.images, &subset.annotations)?;
        stats.classes_written += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn images(n: usize) -> Vec<DerivedImage> {
        (0..n)
            .map(|i| DerivedImage {
                id: format!("{}_Test", i),
                file_name: format!("{}_Test.jpg", i),
                width: 100,
                height: 100,
                extra: Map::new(),
            })
            .collect()
    }

    #[test]
    fn split_sizes_are_floored() {
        let mut rng = StdRng::seed_from_u64(42);
        let ratio = SplitRatio {
            train: 0.8,
            val: 0.2,
        };
        let splits = split_images(images(10), ratio, false, &mut rng);

        assert_eq!(splits.train.len(), 8);
        assert_eq!(splits.val.len(), 2);
        assert_eq!(splits.dropped, 0);
        assert!(splits.test.is_none());
    }

    #[test]
    fn split_truncates_remainder_without_test_split() {
        // floor(0.8 * 3) = 2, floor(0.2 * 3) = 0: one image is lost.
        let mut rng = StdRng::seed_from_u64(42);
        let ratio = SplitRatio {
            train: 0.8,
            val: 0.2,
        };
        let splits = split_images(images(3), ratio, false, &mut rng);

        assert_eq!(splits.train.len(), 2);
        assert_eq!(splits.val.len(), 0);
        assert_eq!(splits.dropped, 1);
    }

    #[test]
    fn split_remainder_goes_to_test_when_enabled() {
        let mut rng = StdRng::seed_from_u64(42);
        let ratio = SplitRatio {
            train: 0.8,
            val: 0.2,
        };
        let splits = split_images(images(3), ratio, true, &mut rng);

        assert_eq!(splits.train.len(), 2);
        assert_eq!(splits.val.len(), 0);
        assert_eq!(splits.test.as_ref().map(Vec::len), Some(1));
        assert_eq!(splits.dropped, 0);
    }

    #[test]
    fn oversized_ratios_never_overrun() {
        let mut rng = StdRng::seed_from_u64(1);
        let ratio = SplitRatio {
            train: 0.9,
            val: 0.9,
        };
        let splits = split_images(images(10), ratio, false, &mut rng);

        assert_eq!(splits.train.len(), 9);
        assert_eq!(splits.val.len(), 1);
        assert_eq!(splits.dropped, 0);
    }

    #[test]
    fn seeded_splits_are_reproducible() {
        let ratio = SplitRatio {
            train: 0.5,
            val: 0.5,
        };
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = split_images(images(20), ratio, false, &mut rng_a);
        let b = split_images(images(20), ratio, false, &mut rng_b);

        let ids = |s: &[DerivedImage]| s.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a.train), ids(&b.train));
        assert_eq!(ids(&a.val), ids(&b.val));
    }
}
