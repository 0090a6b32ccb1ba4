//! 白底抠除
//!
//! 把接近白色、低饱和度的背景像素变为完全透明，其余像素完全不透明。
//! 纯逐像素二值蒙版，无空间上下文、无边缘平滑，结果确定且幂等。

use image::RgbaImage;

/// 亮度阈值：r、g、b 均需大于该值才算背景
const WHITE_THRESHOLD: u8 = 235;
/// 通道差阈值：max(r,g,b) - min(r,g,b) 小于该值才算低饱和
const CHANNEL_DIFF_THRESHOLD: u8 = 22;

fn is_background(r: u8, g: u8, b: u8) -> bool {
    let max_channel = r.max(g).max(b);
    let min_channel = r.min(g).min(b);
    r > WHITE_THRESHOLD
        && g > WHITE_THRESHOLD
        && b > WHITE_THRESHOLD
        && max_channel - min_channel < CHANNEL_DIFF_THRESHOLD
}

/// 生成透明背景版本（尺寸不变，仅修改 alpha 通道）
///
/// 背景像素 alpha = 0，其余 alpha = 255。锯齿边缘是已接受的限制。
pub fn strip(thumbnail: &RgbaImage) -> RgbaImage {
    let mut output = thumbnail.clone();
    for pixel in output.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        pixel.0[3] = if is_background(r, g, b) { 0 } else { 255 };
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_pure_white_becomes_transparent() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        let out = strip(&img);
        assert!(out.pixels().all(|p| p.0[3] == 0));
        assert_eq!(out.dimensions(), img.dimensions());
    }

    #[test]
    fn test_pure_black_stays_opaque() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        let out = strip(&img);
        assert!(out.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_threshold_boundaries() {
        // 236/236/236 刚好超过亮度阈值，通道差 0 -> 背景
        assert!(is_background(236, 236, 236));
        // 235 不满足严格大于 -> 前景
        assert!(!is_background(235, 255, 255));
        // 高亮但饱和（通道差 22）-> 前景
        assert!(!is_background(255, 255, 233));
        // 通道差 21 仍算背景
        assert!(is_background(255, 255, 236));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let mut img = RgbaImage::new(4, 2);
        let samples = [
            Rgba([255, 255, 255, 255]),
            Rgba([240, 238, 241, 17]),
            Rgba([30, 60, 200, 255]),
            Rgba([250, 200, 200, 0]),
        ];
        for (i, pixel) in img.pixels_mut().enumerate() {
            *pixel = samples[i % samples.len()];
        }
        let once = strip(&img);
        let twice = strip(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_only_alpha_changes() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([12, 200, 90, 128]));
        let out = strip(&img);
        for (before, after) in img.pixels().zip(out.pixels()) {
            assert_eq!(before.0[..3], after.0[..3]);
            assert_eq!(after.0[3], 255);
        }
    }
}
