//! 检测服务响应结构
//!
//! 服务端把 `data` 的字段平铺在响应顶层或嵌套在 `data` 下，两种格式都要兼容。

use serde::{Deserialize, Serialize};

use docmark_core::{CountByClass, Detection};

/// `/detect` 响应数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectData {
    pub detections: Vec<Detection>,
    /// 服务端预裁剪的缩略图（可选）
    pub crops: Vec<ServiceCrop>,
    pub count: usize,
    pub count_by_class: CountByClass,
    pub processing_time_ms: f64,
    /// 平均置信度，百分比 `[0, 100]`
    pub avg_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    /// 标注图 data URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_with_boxes: Option<String>,
    /// 原图 data URI（PDF 请求时用于客户端裁剪）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_url: Option<String>,
    /// 本地兜底结果标记（服务不可用时）
    pub placeholder: bool,
}

/// 服务端预裁剪缩略图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCrop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 类别标签（注意：字段名为 `class`，与检测项的 `class_name` 不同）
    pub class: String,
    /// 置信度，百分比 `[0, 100]`
    pub confidence: f32,
    pub bbox: CropBBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_bbox: Option<CropBBox>,
    /// data URI 编码的图像
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CropSize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropBBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSize {
    pub width: u32,
    pub height: u32,
}

/// `/summarize` 响应数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryData {
    pub summary: String,
    pub count_by_class: CountByClass,
    pub page_count: u32,
    /// 平均置信度，百分比 `[0, 100]`
    pub avg_confidence: f64,
    pub note: String,
}

/// `/health` 响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub model: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_data_parses_service_fixture() {
        let raw = r#"{
            "detections": [
                {"class": 0, "class_name": "signature", "confidence": 0.97,
                 "bbox": [100.0, 100.0, 250.0, 180.0], "source": "original"}
            ],
            "crops": [
                {"id": "annotation_1", "class": "signature", "confidence": 97.0,
                 "bbox": {"x1": 100.0, "y1": 100.0, "x2": 250.0, "y2": 180.0,
                          "width": 150.0, "height": 80.0},
                 "crop_bbox": {"x1": 90, "y1": 90, "x2": 260, "y2": 190},
                 "image": "data:image/jpeg;base64,QUJD",
                 "size": {"width": 170, "height": 100}}
            ],
            "count": 1,
            "count_by_class": {"signature": 1, "stamp": 0, "qr_code": 0},
            "processing_time_ms": 142.7,
            "avg_confidence": 97.0,
            "image_with_boxes": "data:image/jpeg;base64,QUJD",
            "original_image": "data:image/jpeg;base64,QUJD",
            "filename": "result_20250101_120000.pdf"
        }"#;
        let data: DetectData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.count, 1);
        assert_eq!(data.count_by_class.signature, 1);
        assert_eq!(data.crops.len(), 1);
        assert_eq!(data.crops[0].class, "signature");
        assert_eq!(data.crops[0].bbox.width, Some(150.0));
        assert!(!data.placeholder);
        assert!(data.page_count.is_none());
    }

    #[test]
    fn test_summary_data_defaults() {
        let data: SummaryData = serde_json::from_str(r#"{"summary": "ok"}"#).unwrap();
        assert_eq!(data.summary, "ok");
        assert_eq!(data.page_count, 0);
        assert!(data.note.is_empty());
    }
}
