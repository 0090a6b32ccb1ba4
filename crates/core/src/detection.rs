//! Detection records as returned by the detection service.

use serde::{Deserialize, Serialize};

use crate::Category;

/// A single detected region in source-image pixel coordinates.
///
/// `bbox` is `[x1, y1, x2, y2]` with `x2 >= x1`, `y2 >= y1`. Coordinates
/// may extend past the image edge; consumers clamp via [`Detection::clamped_bbox`]
/// before any pixel access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Numeric model class, when present (0 signature, 1 stamp, 2 qr_code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<u32>,
    pub class_name: String,
    /// Confidence score in `[0, 1]`.
    pub confidence: f32,
    pub bbox: [f32; 4],
    /// 1-based page number for multi-page documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Detection {
    pub fn category(&self) -> Option<Category> {
        Category::resolve(&self.class_name, self.class)
    }

    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }

    /// Bounding box clamped to `[0, width] x [0, height]`.
    pub fn clamped_bbox(&self, width: u32, height: u32) -> [f32; 4] {
        let w = width as f32;
        let h = height as f32;
        [
            self.bbox[0].clamp(0.0, w),
            self.bbox[1].clamp(0.0, h),
            self.bbox[2].clamp(0.0, w),
            self.bbox[3].clamp(0.0, h),
        ]
    }
}

/// Per-category detection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountByClass {
    pub signature: u32,
    pub stamp: u32,
    pub qr_code: u32,
}

impl CountByClass {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Signature => self.signature,
            Category::Stamp => self.stamp,
            Category::QrCode => self.qr_code,
        }
    }

    pub fn bump(&mut self, category: Category) {
        match category {
            Category::Signature => self.signature += 1,
            Category::Stamp => self.stamp += 1,
            Category::QrCode => self.qr_code += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.signature + self.stamp + self.qr_code
    }
}

/// Aggregate statistics over a detection batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DetectionStats {
    pub count_by_class: CountByClass,
    /// Mean confidence as a percentage in `[0, 100]`, rounded to one decimal.
    pub avg_confidence: f64,
}

impl DetectionStats {
    pub fn from_detections(detections: &[Detection]) -> DetectionStats {
        let mut counts = CountByClass::default();
        for det in detections {
            if let Some(category) = det.category() {
                counts.bump(category);
            }
        }
        let avg = if detections.is_empty() {
            0.0
        } else {
            let sum: f64 = detections.iter().map(|d| d.confidence as f64).sum();
            (sum / detections.len() as f64 * 1000.0).round() / 10.0
        };
        DetectionStats {
            count_by_class: counts,
            avg_confidence: avg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class_name: &str, confidence: f32, bbox: [f32; 4]) -> Detection {
        Detection {
            class: None,
            class_name: class_name.to_string(),
            confidence,
            bbox,
            page: None,
        }
    }

    #[test]
    fn test_clamped_bbox() {
        let d = det("stamp", 0.9, [-10.0, -5.0, 820.0, 300.0]);
        assert_eq!(d.clamped_bbox(800, 600), [0.0, 0.0, 800.0, 300.0]);
    }

    #[test]
    fn test_stats_counts_and_percent() {
        let dets = vec![
            det("signature", 0.97, [0.0, 0.0, 10.0, 10.0]),
            det("seal", 0.91, [0.0, 0.0, 10.0, 10.0]),
            det("watermark", 0.5, [0.0, 0.0, 10.0, 10.0]),
        ];
        let stats = DetectionStats::from_detections(&dets);
        assert_eq!(stats.count_by_class.signature, 1);
        assert_eq!(stats.count_by_class.stamp, 1);
        assert_eq!(stats.count_by_class.qr_code, 0);
        // watermark 不计入任何类别，但参与平均置信度
        assert!((stats.avg_confidence - 79.3).abs() < 0.05);
    }

    #[test]
    fn test_stats_empty() {
        let stats = DetectionStats::from_detections(&[]);
        assert_eq!(stats.count_by_class.total(), 0);
        assert_eq!(stats.avg_confidence, 0.0);
    }

    #[test]
    fn test_detection_deserializes_service_json() {
        let raw = r#"{
            "class": 0,
            "class_name": "signature",
            "confidence": 0.97,
            "bbox": [100.0, 100.0, 250.0, 180.0],
            "page": 2,
            "source": "original"
        }"#;
        let d: Detection = serde_json::from_str(raw).unwrap();
        assert_eq!(d.category(), Some(crate::Category::Signature));
        assert_eq!(d.page, Some(2));
        assert_eq!(d.width(), 150.0);
        assert_eq!(d.height(), 80.0);
    }
}
