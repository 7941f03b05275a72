use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

/// Derived image id for one (original id, merged class) pair.
pub fn derived_id(image_id: i64, class_name: &str) -> String {
    format!("{}_{}", image_id, class_name)
}

/// Derived file name: the class name is appended to the stem so the same
/// source image can land in several class datasets without colliding.
pub fn derived_file_name(file_name: &str, class_name: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, class_name, ext.to_string_lossy()),
        None => format!("{}_{}", stem, class_name),
    }
}

/// Recover the original file name from a derived one by stripping the
/// `_{class}` suffix off the stem. Returns None if the suffix is absent,
/// which would mean the name was not produced by this tool.
pub fn original_file_name(derived_name: &str, class_name: &str) -> Option<String> {
    let path = Path::new(derived_name);
    let stem = path.file_stem()?.to_str()?;
    let original_stem = stem.strip_suffix(&format!("_{}", class_name))?;
    Some(match path.extension() {
        Some(ext) => format!("{}.{}", original_stem, ext.to_str()?),
        None => original_stem.to_string(),
    })
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Safely create output directories and return their paths
pub fn create_output_directory(path: &Path) -> std::io::Result<std::path::PathBuf> {
    if path.exists() {
        log::warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).and_then(|_| fs::create_dir_all(path))?;
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names_round_trip() {
        assert_eq!(derived_id(5, "Plastique"), "5_Plastique");
        assert_eq!(derived_file_name("a.jpg", "Plastique"), "a_Plastique.jpg");
        assert_eq!(
            original_file_name("a_Plastique.jpg", "Plastique").as_deref(),
            Some("a.jpg")
        );
    }

    #[test]
    fn derived_name_survives_underscores_in_stem() {
        assert_eq!(
            derived_file_name("IMG_2024_01.png", "Verre"),
            "IMG_2024_01_Verre.png"
        );
        assert_eq!(
            original_file_name("IMG_2024_01_Verre.png", "Verre").as_deref(),
            Some("IMG_2024_01.png")
        );
    }

    #[test]
    fn foreign_name_does_not_resolve() {
        assert_eq!(original_file_name("a_Metal.jpg", "Verre"), None);
    }

    #[test]
    fn extensionless_names_are_handled() {
        assert_eq!(derived_file_name("scan", "Bois"), "scan_Bois");
        assert_eq!(original_file_name("scan_Bois", "Bois").as_deref(), Some("scan"));
    }
}
