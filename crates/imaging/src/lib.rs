//! 检测区域缩略图处理
//!
//! 从源图像按检测框裁剪缩略图，并提供白底抠除（透明背景）能力

mod annotate;
mod error;
mod extract;
mod matte;

pub use annotate::annotate;
pub use error::ImagingError;
pub use extract::{extract, Thumbnail, CROP_PADDING};
pub use matte::strip;

use docmark_core::Category;

/// 按类别分组的缩略图引用，顺序与 [`Category::ALL`] 一致
///
/// 未能归类的缩略图不会出现在任何分组中（调用方在创建缩略图时已记录警告）。
pub fn group_by_category(thumbnails: &[Thumbnail]) -> [(Category, Vec<&Thumbnail>); 3] {
    let mut groups = Category::ALL.map(|category| (category, Vec::new()));
    for thumb in thumbnails {
        if let Some(category) = thumb.category {
            for (group_category, members) in groups.iter_mut() {
                if *group_category == category {
                    members.push(thumb);
                }
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn thumb(label: &str) -> Thumbnail {
        Thumbnail::routed(RgbaImage::new(4, 4), label.to_string(), None, 0.9, None)
    }

    #[test]
    fn test_group_by_category_keeps_input_order() {
        let thumbs = vec![thumb("stamp"), thumb("signature"), thumb("stamp")];
        let groups = group_by_category(&thumbs);
        assert_eq!(groups[0].1.len(), 1); // signatures
        assert_eq!(groups[1].1.len(), 2); // stamps
        assert_eq!(groups[2].1.len(), 0); // qr codes
        assert!((groups[1].1[0].confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_group_by_category_drops_unrouted() {
        let thumbs = vec![thumb("watermark")];
        let groups = group_by_category(&thumbs);
        assert!(groups.iter().all(|(_, members)| members.is_empty()));
    }
}
