//! 缩略图提取
//!
//! 按检测框从源图像裁剪区域：四周加固定边距，并收拢到图像边界内，
//! 保证永远不会读取源缓冲区之外的像素

use image::{DynamicImage, RgbaImage};

use docmark_core::{Category, Detection};

/// 裁剪边距（像素，四周各加一次）
pub const CROP_PADDING: u32 = 5;

/// 一张按检测区域裁剪出的缩略图
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub image: RgbaImage,
    /// 服务端返回的原始类别标签
    pub class_name: String,
    /// 归类结果；无法识别的标签归类为 `None`
    pub category: Option<Category>,
    /// 置信度 `[0, 1]`
    pub confidence: f32,
    pub page: Option<u32>,
}

impl Thumbnail {
    /// 创建缩略图并按统一映射表归类
    ///
    /// 标签无法识别时记录警告并保留原始标签，缩略图不进入任何类别。
    pub fn routed(
        image: RgbaImage,
        class_name: String,
        class_index: Option<u32>,
        confidence: f32,
        page: Option<u32>,
    ) -> Thumbnail {
        let category = match Category::try_from_label(&class_name) {
            Ok(category) => Some(category),
            Err(err) => match class_index.and_then(Category::from_index) {
                Some(category) => Some(category),
                None => {
                    log::warn!("[Thumbs] {}，该缩略图不归入任何类别", err);
                    None
                }
            },
        };
        Thumbnail {
            image,
            class_name,
            category,
            confidence,
            page,
        }
    }

    /// 显示用置信度标签，如 `97%`
    pub fn confidence_label(&self) -> String {
        format!("{}%", (self.confidence * 100.0).round() as u32)
    }
}

/// 带边距并收拢到边界内的裁剪矩形 `(x, y, w, h)`
///
/// `crop_w = min(width - crop_x, ceil(box_w + 2*padding))`，高度同理。
/// 检测框为空（宽或高不足 1 像素）时返回 `None`。
fn crop_rect(bbox: [f32; 4], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let [x1, y1, x2, y2] = bbox;
    let box_w = x2 - x1;
    let box_h = y2 - y1;
    if box_w < 1.0 || box_h < 1.0 {
        return None;
    }

    let pad = CROP_PADDING as f32;
    let crop_x = (x1 - pad).floor().max(0.0) as u32;
    let crop_y = (y1 - pad).floor().max(0.0) as u32;
    if crop_x >= width || crop_y >= height {
        return None;
    }

    let crop_w = ((box_w + 2.0 * pad).ceil() as u32).min(width - crop_x);
    let crop_h = ((box_h + 2.0 * pad).ceil() as u32).min(height - crop_y);
    if crop_w == 0 || crop_h == 0 {
        return None;
    }

    Some((crop_x, crop_y, crop_w, crop_h))
}

/// 按检测列表顺序提取缩略图
///
/// 源图像只读（`crop_imm`），输出顺序与输入顺序一致。空列表产生空输出。
pub fn extract(source: &DynamicImage, regions: &[Detection]) -> Vec<Thumbnail> {
    let (width, height) = (source.width(), source.height());
    let mut thumbnails = Vec::with_capacity(regions.len());

    for (index, region) in regions.iter().enumerate() {
        let bbox = region.clamped_bbox(width, height);
        let Some((x, y, w, h)) = crop_rect(bbox, width, height) else {
            log::warn!(
                "[Thumbs] 检测 #{} ({}) 的区域为空，跳过: {:?}",
                index,
                region.class_name,
                region.bbox
            );
            continue;
        };

        log::debug!(
            "[Thumbs] 检测 #{} ({}): 裁剪 x={}, y={}, w={}, h={}",
            index,
            region.class_name,
            x,
            y,
            w,
            h
        );

        let crop = source.crop_imm(x, y, w, h).to_rgba8();
        thumbnails.push(Thumbnail::routed(
            crop,
            region.class_name.clone(),
            region.class,
            region.confidence,
            region.page,
        ));
    }

    thumbnails
}
