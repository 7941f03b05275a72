use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line arguments for splitting a COCO annotation set into
/// per-superclass YOLO datasets.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// COCO annotation file (images/annotations/categories)
    #[arg(short = 'c', long = "coco_json")]
    pub coco_json: PathBuf,

    /// Directory containing the source image files
    #[arg(short = 'i', long = "image_dir")]
    pub image_dir: PathBuf,

    /// Output root; one dataset directory is created per merged class
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: PathBuf,

    /// JSON file mapping merged class names to original category id lists
    #[arg(short = 'm', long = "merge_config")]
    pub merge_config: PathBuf,

    /// Proportion of each class dataset used for training
    #[arg(long = "train_size", default_value_t = 0.8, value_parser = validate_size)]
    pub train_size: f64,

    /// Proportion of each class dataset used for validation
    #[arg(long = "val_size", default_value_t = 0.2, value_parser = validate_size)]
    pub val_size: f64,

    /// Assign the remainder after train/val to a held-out test split
    #[arg(long = "include_test")]
    pub include_test: bool,

    /// Seed for the split shuffle; omit for a fresh shuffle each run
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Clamp normalized bbox values to [0, 1]
    #[arg(long = "clamp")]
    pub clamp: bool,
}

// Validate that the size is between 0.0 and 1.0
fn validate_size(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("SIZE must be between 0.0 and 1.0".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert!(validate_size("0.5").is_ok());
        assert!(validate_size("1.0").is_ok());
        assert!(validate_size("0.0").is_ok());
        assert!(validate_size("-0.1").is_err());
        assert!(validate_size("1.1").is_err());
        assert!(validate_size("abc").is_err());
    }
}
