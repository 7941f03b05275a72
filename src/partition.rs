//! Groups the raw annotation set into per-merged-class sub-datasets.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::{Annotation, CocoFile, DerivedAnnotation, DerivedImage, RunStats};
use crate::utils::{derived_file_name, derived_id};

/// One merged class's share of the dataset: derived image records, the
/// annotations re-pointed at them, and (for reporting) the original image
/// ids that contributed.
#[derive(Debug, Default, Clone)]
pub struct ClassSubset {
    pub images: Vec<DerivedImage>,
    pub annotations: Vec<DerivedAnnotation>,
    pub source_image_ids: HashSet<i64>,
}

impl ClassSubset {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Build one sub-dataset per merged class. Every configured class gets an
/// entry, even if nothing maps to it. An image joins a class exactly when
/// it has at least one annotation whose category id resolves to that class;
/// annotations with unresolved category ids are dropped and counted.
///
/// Image order follows the input image list, annotation order the input
/// annotation list.
pub fn partition_by_class<'a>(
    coco: &CocoFile,
    merged_map: &HashMap<i64, String>,
    class_names: impl IntoIterator<Item = &'a str>,
    stats: &mut RunStats,
) -> BTreeMap<String, ClassSubset> {
    let mut subsets: BTreeMap<String, ClassSubset> = class_names
        .into_iter()
        .map(|name| (name.to_string(), ClassSubset::default()))
        .collect();

    let mut anns_by_image: HashMap<i64, Vec<&Annotation>> = HashMap::new();
    for ann in &coco.annotations {
        anns_by_image.entry(ann.image_id).or_default().push(ann);
    }

    for image in &coco.images {
        let Some(image_anns) = anns_by_image.get(&image.id) else {
            continue;
        };

        let mut anns_by_class: BTreeMap<&str, Vec<&Annotation>> = BTreeMap::new();
        for ann in image_anns {
            match merged_map.get(&ann.category_id) {
                Some(class_name) => anns_by_class
                    .entry(class_name.as_str())
                    .or_default()
                    .push(ann),
                None => stats.annotations_dropped += 1,
            }
        }

        for (class_name, class_anns) in anns_by_class {
            let new_id = derived_id(image.id, class_name);
            let subset = subsets.entry(class_name.to_string()).or_default();

            subset.images.push(DerivedImage {
                id: new_id.clone(),
                file_name: derived_file_name(&image.file_name, class_name),
                width: image.width,
                height: image.height,
                extra: image.extra.clone(),
            });
            subset.source_image_ids.insert(image.id);

            for ann in class_anns {
                subset.annotations.push(DerivedAnnotation {
                    id: ann.id,
                    image_id: new_id.clone(),
                    category_id: ann.category_id,
                    bbox: ann.bbox,
                    extra: ann.extra.clone(),
                });
            }
        }
    }

    subsets
}
