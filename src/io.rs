use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::{Category, ClassSnapshot, CocoFile, DerivedAnnotation, DerivedImage};
use crate::utils::create_output_directory;

/// Parse a COCO annotation file directly from a file stream.
pub fn read_coco_file(path: &Path) -> Result<CocoFile, Error> {
    let file = File::open(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(file).map_err(|source| Error::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Output directory tree for one merged class.
#[derive(Debug)]
pub struct ClassDirs {
    pub root: PathBuf,
    pub train_images_dir: PathBuf,
    pub train_labels_dir: PathBuf,
    pub val_images_dir: PathBuf,
    pub val_labels_dir: PathBuf,
    pub test_images_dir: Option<PathBuf>,
    pub test_labels_dir: Option<PathBuf>,
}

/// Set up `<output_root>/<class>/{train,val[,test]}/{images,labels}`.
pub fn setup_class_directories(
    output_root: &Path,
    class_name: &str,
    include_test: bool,
) -> std::io::Result<ClassDirs> {
    let root = create_output_directory(&output_root.join(class_name))?;

    let train_images_dir = create_output_directory(&root.join("train").join("images"))?;
    let train_labels_dir = create_output_directory(&root.join("train").join("labels"))?;
    let val_images_dir = create_output_directory(&root.join("val").join("images"))?;
    let val_labels_dir = create_output_directory(&root.join("val").join("labels"))?;

    let (test_images_dir, test_labels_dir) = if include_test {
        (
            Some(create_output_directory(&root.join("test").join("images"))?),
            Some(create_output_directory(&root.join("test").join("labels"))?),
        )
    } else {
        (None, None)
    };

    Ok(ClassDirs {
        root,
        train_images_dir,
        train_labels_dir,
        val_images_dir,
        val_labels_dir,
        test_images_dir,
        test_labels_dir,
    })
}

/// Write `classes.txt`: the one class this dataset contains.
pub fn write_class_manifest(class_root: &Path, class_name: &str) -> std::io::Result<()> {
    let mut manifest = BufWriter::new(File::create(class_root.join("classes.txt"))?);
    writeln!(manifest, "{}", class_name)?;
    manifest.flush()
}

/// Write the filtered COCO snapshot `<cls>/<cls>_coco.json` holding the
/// class's derived images and annotations under a single synthetic category.
pub fn write_coco_snapshot(
    class_root: &Path,
    class_name: &str,
    images: &[DerivedImage],
    annotations: &[DerivedAnnotation],
) -> Result<(), Error> {
    let snapshot = ClassSnapshot {
        images,
        annotations,
        categories: vec![Category::synthetic(class_name)],
    };
    let path = class_root.join(format!("{}_coco.json", class_name));
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writer.flush()?;
    Ok(())
}
