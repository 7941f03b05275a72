//! COCO to per-superclass YOLO dataset splitter
//!
//! This library converts a COCO-style annotation set into one YOLO dataset
//! per merged superclass, with a randomized train/validation(/test) split.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod materialize;
pub mod merge;
pub mod partition;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::Args;
pub use conversion::{convert_bbox_coco2yolo, YoloBbox};
pub use dataset::{process_dataset, split_images, SplitRatio, SplitSets};
pub use error::Error;
pub use io::read_coco_file;
pub use merge::MergeConfig;
pub use partition::{partition_by_class, ClassSubset};
pub use types::{Annotation, CocoFile, DerivedAnnotation, DerivedImage, Image, RunStats};
