use std::path::{Path, PathBuf};

use anyhow::Context;
use image::DynamicImage;

use docmark_client::{data_uri, DetectClient, DetectData};
use docmark_core::Category;
use docmark_imaging::{annotate, extract, group_by_category, Thumbnail};

use crate::config::AppConfig;
use crate::export;
use crate::session::Session;

/// 检测流程：上传 -> 取回结果 -> 生成缩略图 -> 打印统计 -> 按需导出
pub fn run_detect(
  config: &AppConfig,
  file: &Path,
  out: Option<PathBuf>,
  annotated: bool,
  json: bool,
  transparent: bool,
) -> anyhow::Result<()> {
  let client = DetectClient::new(&config.endpoint, config.timeout_secs)?;
  client.validate_upload(file)?;

  let mut session = Session::new();
  let token = session.begin(file);

  let mut data = client.detect_or_placeholder(file)?;
  if data.placeholder {
    log::warn!("[Detect] 当前为本地占位结果，非真实检测");
  }

  // 缩略图用原图：PDF 等场景服务端会回传合并后的原图
  let source = load_source(&data, file);
  let thumbnails = build_thumbnails(&data, source.as_ref());

  // 服务端没给标注图时本地绘制并回填，PNG 导出与 JSON 导出共用
  if data.image_with_boxes.is_none() && !data.detections.is_empty() {
    if let Some(source) = source.as_ref() {
      let drawn = annotate(source, &data.detections);
      match export::encode_png(&drawn) {
        Ok(bytes) => data.image_with_boxes = Some(data_uri::encode_png(&bytes)),
        Err(err) => log::warn!("[Detect] 本地标注图编码失败: {}", err),
      }
    }
  }

  // 结果必须经会话登记；过期序号的响应在此被丢弃
  if !session.complete(token, data) {
    return Ok(());
  }
  let Some(data) = session.last_result() else {
    return Ok(());
  };
  if let Some(last) = session.last_file() {
    log::debug!("[Session] 结果已登记: {}", last.display());
  }
  print_report(data, &thumbnails);

  let out_dir = out.unwrap_or_else(|| PathBuf::from(&config.output_dir));
  if annotated {
    match annotated_image(data) {
      Some(image) => {
        export::save_annotated(&out_dir, &image)?;
      }
      None => log::warn!("[Detect] 无标注图可导出（源图像不可用）"),
    }
  }
  if json {
    export::save_json(&out_dir, data)?;
  }
  if transparent {
    for (category, members) in group_by_category(&thumbnails) {
      if members.is_empty() {
        continue;
      }
      export::write_nobg_zip(&out_dir, category, &members)?;
    }
  }

  Ok(())
}

/// 查看或修改本地配置
pub fn run_config(
  set_endpoint: Option<String>,
  set_timeout: Option<u64>,
  set_output_dir: Option<String>,
) -> anyhow::Result<()> {
  let mut config = crate::config::load_config()?;
  let changed = set_endpoint.is_some() || set_timeout.is_some() || set_output_dir.is_some();

  if let Some(endpoint) = set_endpoint {
    config.endpoint = endpoint;
  }
  if let Some(timeout) = set_timeout {
    config.timeout_secs = timeout;
  }
  if let Some(output_dir) = set_output_dir {
    config.output_dir = output_dir;
  }
  if changed {
    crate::config::save_config(&config)?;
    log::info!("[Config] 配置已保存: {:?}", crate::config::config_path()?);
  }

  println!("{}", serde_json::to_string_pretty(&config)?);
  Ok(())
}

/// 摘要流程。与检测不同，失败必须让用户感知
pub fn run_summarize(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
  let client = DetectClient::new(&config.endpoint, config.timeout_secs)?;
  client.validate_upload(file)?;

  let data = client
    .summarize(file)
    .context("AI Summary failed")?;

  println!("Document summary");
  println!("{}", data.summary);
  println!(
    "Signatures: {} | Stamps: {} | QR: {} | Pages: {} | Avg conf: {}%",
    data.count_by_class.signature,
    data.count_by_class.stamp,
    data.count_by_class.qr_code,
    data.page_count.max(1),
    data.avg_confidence.round() as u32
  );
  if !data.note.is_empty() {
    println!("{}", data.note);
  }
  Ok(())
}

pub fn run_health(config: &AppConfig) -> anyhow::Result<()> {
  let client = DetectClient::new(&config.endpoint, config.timeout_secs)?;
  let status = client.health().context("detection service unreachable")?;
  println!("status: {}", status.status);
  if !status.model.is_empty() {
    println!("model: {}", status.model);
  }
  Ok(())
}

/// 取得缩略图与标注的源图像
///
/// 优先使用服务端回传的原图（PDF 已由服务端合并渲染）；
/// 否则直接解码本地上传文件。两者都失败时返回 None。
fn load_source(data: &DetectData, file: &Path) -> Option<DynamicImage> {
  if let Some(uri) = &data.original_image {
    match data_uri::decode(uri).map_err(anyhow::Error::from).and_then(|bytes| {
      image::load_from_memory(&bytes).map_err(anyhow::Error::from)
    }) {
      Ok(image) => return Some(image),
      Err(err) => log::warn!("[Detect] 服务端原图解码失败: {}", err),
    }
  }
  match image::open(file) {
    Ok(image) => Some(image),
    Err(err) => {
      log::warn!("[Detect] 本地源图像不可解码（PDF?）: {}", err);
      None
    }
  }
}

/// 生成缩略图
///
/// 服务端带了预裁剪 crops 时只做归类；否则用检测框在原图上本地裁剪。
fn build_thumbnails(data: &DetectData, source: Option<&DynamicImage>) -> Vec<Thumbnail> {
  if !data.crops.is_empty() {
    log::info!("[Detect] 使用服务端预裁剪缩略图: {} 个", data.crops.len());
    let mut thumbnails = Vec::with_capacity(data.crops.len());
    for (index, crop) in data.crops.iter().enumerate() {
      let image = data_uri::decode(&crop.image)
        .map_err(|err| err.to_string())
        .and_then(|bytes| {
          image::load_from_memory(&bytes)
            .map(|img| img.to_rgba8())
            .map_err(|err| err.to_string())
        });
      match image {
        Ok(image) => thumbnails.push(Thumbnail::routed(
          image,
          crop.class.clone(),
          None,
          crop.confidence / 100.0,
          crop.page,
        )),
        // 单个坏缩略图不终止整批
        Err(err) => log::warn!("[Detect] crop #{} 解码失败，跳过: {}", index, err),
      }
    }
    return thumbnails;
  }

  match source {
    Some(source) if !data.detections.is_empty() => {
      log::info!("[Detect] 服务端未返回 crops，本地裁剪 {} 个区域", data.detections.len());
      extract(source, &data.detections)
    }
    _ => Vec::new(),
  }
}

/// 标注图（服务端返回或本地回填的 data URI）
fn annotated_image(data: &DetectData) -> Option<image::RgbaImage> {
  let uri = data.image_with_boxes.as_ref()?;
  match data_uri::decode(uri)
    .ok()
    .and_then(|bytes| image::load_from_memory(&bytes).ok())
  {
    Some(image) => Some(image.to_rgba8()),
    None => {
      log::warn!("[Detect] 标注图解码失败");
      None
    }
  }
}

/// 打印检测报告（类别计数、空类别占位文案、页数与耗时）
fn print_report(data: &DetectData, thumbnails: &[Thumbnail]) {
  for line in report_lines(data, thumbnails) {
    println!("{}", line);
  }
}

fn report_lines(data: &DetectData, thumbnails: &[Thumbnail]) -> Vec<String> {
  let mut lines = Vec::new();
  if data.placeholder {
    lines.push("(detection service unavailable - showing placeholder result)".to_string());
  }

  for (category, members) in group_by_category(thumbnails) {
    let count = data.count_by_class.get(category).max(members.len() as u32);
    if members.is_empty() && count == 0 {
      let noun = match category {
        Category::Signature => "signatures",
        Category::Stamp => "stamps",
        Category::QrCode => "QR codes",
      };
      lines.push(format!("{}: no {} detected yet.", category.display_name(), noun));
      continue;
    }
    lines.push(format!("{}: {}", category.display_name(), count));
    for thumb in members {
      let page = thumb
        .page
        .map(|p| format!(" (page {})", p))
        .unwrap_or_default();
      lines.push(format!(
        "  - {} {}{}",
        thumb.class_name,
        thumb.confidence_label(),
        page
      ));
    }
  }

  if let Some(pages) = data.page_count.filter(|p| *p > 1) {
    lines.push(format!("Pages: {}", pages));
  }
  lines.push(format!("Processing time: {}ms", data.processing_time_ms.round() as u64));
  lines.push(format!("Avg confidence: {}%", data.avg_confidence.round() as u32));
  lines
}
