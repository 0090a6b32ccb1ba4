use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::RgbaImage;
use zip::write::SimpleFileOptions;

use docmark_client::DetectData;
use docmark_core::Category;
use docmark_imaging::{strip, Thumbnail};

/// 把 RGBA 图像编码为 PNG 字节
pub fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
  let mut buffer = Vec::new();
  image.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
  Ok(buffer)
}

/// 时间戳结果文件名，如 `result_20250101_120000.png`
pub fn result_filename() -> String {
  chrono::Local::now()
    .format("result_%Y%m%d_%H%M%S.png")
    .to_string()
}

/// 保存标注图 PNG
pub fn save_annotated(dir: &Path, image: &RgbaImage) -> anyhow::Result<PathBuf> {
  fs::create_dir_all(dir)?;
  let path = dir.join(result_filename());
  let bytes = encode_png(image)?;
  fs::write(&path, bytes)?;
  log::info!("[Export] 标注图已保存: {}", path.display());
  Ok(path)
}

/// 保存结构化检测结果 JSON
pub fn save_json(dir: &Path, data: &DetectData) -> anyhow::Result<PathBuf> {
  fs::create_dir_all(dir)?;
  let path = dir.join("detection_results.json");
  let raw = serde_json::to_string_pretty(data)?;
  fs::write(&path, raw)?;
  log::info!("[Export] JSON 已保存: {}", path.display());
  Ok(path)
}

/// 把一个类别的缩略图抠除白底后打包为 ZIP
///
/// 条目命名 `<prefix>_<两位序号>.png`，序号只计成功写入的条目；
/// 单个缩略图编码失败只跳过该条目，不中断整个导出。
pub fn write_nobg_zip(
  dir: &Path,
  category: Category,
  thumbnails: &[&Thumbnail],
) -> anyhow::Result<PathBuf> {
  fs::create_dir_all(dir)?;
  let path = dir.join(category.archive_name());
  let file = fs::File::create(&path)?;
  let mut archive = zip::ZipWriter::new(file);
  let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

  let mut index = 1u32;
  for thumb in thumbnails {
    let transparent = strip(&thumb.image);
    let bytes = match encode_png(&transparent) {
      Ok(bytes) => bytes,
      Err(err) => {
        log::warn!("[Export] 缩略图编码失败，跳过: {}", err);
        continue;
      }
    };
    let name = format!("{}_{:02}.png", category.export_prefix(), index);
    archive.start_file(name, options)?;
    archive.write_all(&bytes)?;
    index += 1;
  }

  archive.finish()?;
  log::info!(
    "[Export] {} 已保存: {} 个条目 -> {}",
    category.archive_name(),
    index - 1,
    path.display()
  );
  Ok(path)
}
