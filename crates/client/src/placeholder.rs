//! 本地兜底结果
//!
//! 服务不可达或返回 `success=false` 时，生成一份确定性的占位结果，
//! 每个类别各一个示例区域，按源图像尺寸等比缩放。

use docmark_core::{Detection, DetectionStats};

use crate::types::DetectData;

/// 占位区域：类别、相对坐标 `[x1, y1, x2, y2]`（比例）、置信度
const SAMPLE_REGIONS: [(&str, u32, [f32; 4], f32); 3] = [
    ("signature", 0, [0.12, 0.68, 0.38, 0.78], 0.96),
    ("stamp", 1, [0.55, 0.60, 0.80, 0.85], 0.93),
    ("qr_code", 2, [0.78, 0.06, 0.92, 0.20], 0.90),
];

/// 生成占位检测结果
pub fn placeholder_result(width: u32, height: u32) -> DetectData {
    let w = width as f32;
    let h = height as f32;

    let detections: Vec<Detection> = SAMPLE_REGIONS
        .iter()
        .map(|(class_name, class, rel, confidence)| Detection {
            class: Some(*class),
            class_name: class_name.to_string(),
            confidence: *confidence,
            bbox: [rel[0] * w, rel[1] * h, rel[2] * w, rel[3] * h],
            page: None,
        })
        .collect();

    let stats = DetectionStats::from_detections(&detections);

    DetectData {
        count: detections.len(),
        count_by_class: stats.count_by_class,
        avg_confidence: stats.avg_confidence,
        processing_time_ms: 0.0,
        detections,
        placeholder: true,
        ..DetectData::default()
    }
}
