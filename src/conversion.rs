//! COCO absolute top-left xywh to YOLO normalized center xywh.

use crate::error::Error;

/// A bbox in YOLO form: center coordinates and extents, normalized by the
/// image dimensions. Values are not rounded and not clamped; a source box
/// that extends past the image boundary yields values outside [0, 1],
/// matching the source data rather than correcting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloBbox {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl YoloBbox {
    /// Opt-in clamping to [0, 1].
    pub fn clamped(self) -> Self {
        Self {
            cx: self.cx.clamp(0.0, 1.0),
            cy: self.cy.clamp(0.0, 1.0),
            w: self.w.clamp(0.0, 1.0),
            h: self.h.clamp(0.0, 1.0),
        }
    }

    /// One YOLO label line. Every output dataset holds exactly one class,
    /// so the class index is always 0.
    pub fn to_label_line(&self) -> String {
        format!(
            "0 {:.6} {:.6} {:.6} {:.6}",
            self.cx, self.cy, self.w, self.h
        )
    }
}

/// Convert a COCO `[x, y, w, h]` bbox (absolute pixels, top-left origin)
/// into YOLO normalized center form. Dimensions must be strictly positive.
pub fn convert_bbox_coco2yolo(
    bbox: [f64; 4],
    img_width: u32,
    img_height: u32,
) -> Result<YoloBbox, Error> {
    if img_width == 0 || img_height == 0 {
        return Err(Error::ZeroDimension {
            width: img_width,
            height: img_height,
        });
    }

    let [x, y, w, h] = bbox;
    let width = img_width as f64;
    let height = img_height as f64;

    Ok(YoloBbox {
        cx: (x + w / 2.0) / width,
        cy: (y + h / 2.0) / height,
        w: w / width,
        h: h / height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_normalized_center_form() {
        let bbox = convert_bbox_coco2yolo([10.0, 10.0, 20.0, 20.0], 100, 100).unwrap();
        assert_eq!(bbox.cx, 0.2);
        assert_eq!(bbox.cy, 0.2);
        assert_eq!(bbox.w, 0.2);
        assert_eq!(bbox.h, 0.2);
    }

    #[test]
    fn conversion_is_invertible() {
        let (img_w, img_h) = (1920u32, 1080u32);
        let original = [17.0, 233.5, 410.25, 96.0];
        let bbox = convert_bbox_coco2yolo(original, img_w, img_h).unwrap();

        let w = bbox.w * img_w as f64;
        let h = bbox.h * img_h as f64;
        let x = bbox.cx * img_w as f64 - w / 2.0;
        let y = bbox.cy * img_h as f64 - h / 2.0;

        for (restored, expected) in [x, y, w, h].iter().zip(original.iter()) {
            assert!((restored - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_dimension_is_an_error() {
        assert!(convert_bbox_coco2yolo([0.0, 0.0, 1.0, 1.0], 0, 100).is_err());
        assert!(convert_bbox_coco2yolo([0.0, 0.0, 1.0, 1.0], 100, 0).is_err());
    }

    #[test]
    fn out_of_bounds_box_passes_through_unclamped() {
        // Box extends 20px past the right edge of a 100px image.
        let bbox = convert_bbox_coco2yolo([90.0, 0.0, 30.0, 10.0], 100, 100).unwrap();
        assert!(bbox.cx > 1.0);

        let clamped = bbox.clamped();
        assert_eq!(clamped.cx, 1.0);
        assert_eq!(clamped.w, 0.3);
    }

    #[test]
    fn label_line_uses_six_decimals_and_class_zero() {
        let bbox = convert_bbox_coco2yolo([50.0, 50.0, 10.0, 10.0], 100, 100).unwrap();
        assert_eq!(bbox.to_label_line(), "0 0.550000 0.550000 0.100000 0.100000");
    }
}
