//! 检测框标注
//!
//! 在源图像上按类别颜色绘制检测框，用于服务端未返回标注图时的本地回退。

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use docmark_core::Detection;

/// 边框线宽（像素）
const BOX_THICKNESS: i32 = 3;

/// 在源图像副本上绘制所有检测框，返回标注后的图像
pub fn annotate(source: &DynamicImage, detections: &[Detection]) -> RgbaImage {
    let mut canvas = source.to_rgba8();
    let (width, height) = canvas.dimensions();

    for det in detections {
        let [x1, y1, x2, y2] = det.clamped_bbox(width, height);
        let w = (x2 - x1).round() as i32;
        let h = (y2 - y1).round() as i32;
        if w < 1 || h < 1 {
            continue;
        }

        let color = det
            .category()
            .map(|c| Rgba(c.color()))
            .unwrap_or(Rgba([255, 255, 255, 255]));

        // imageproc 的空心矩形线宽为 1，画同心矩形得到粗边框
        for inset in 0..BOX_THICKNESS {
            let rw = w - 2 * inset;
            let rh = h - 2 * inset;
            if rw < 1 || rh < 1 {
                break;
            }
            let rect = Rect::at(x1.round() as i32 + inset, y1.round() as i32 + inset)
                .of_size(rw as u32, rh as u32);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_paints_category_color() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            100,
            100,
            Rgba([255, 255, 255, 255]),
        ));
        let det = Detection {
            class: None,
            class_name: "signature".to_string(),
            confidence: 0.9,
            bbox: [10.0, 10.0, 50.0, 40.0],
            page: None,
        };
        let out = annotate(&source, &[det]);
        assert_eq!(out.dimensions(), (100, 100));
        // 边框左上角取 signature 蓝色
        assert_eq!(out.get_pixel(10, 10).0, [0x3b, 0x82, 0xf6, 0xff]);
        // 框内部不受影响
        assert_eq!(out.get_pixel(30, 25).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_annotate_without_detections_is_copy() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255])));
        let out = annotate(&source, &[]);
        assert_eq!(out, source.to_rgba8());
    }
}
