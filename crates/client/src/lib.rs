//! 检测服务 HTTP 客户端
//!
//! 以 multipart 表单上传文档，调用远端 `/detect`、`/summarize`、`/health`。
//! 网络失败与业务失败（`success=false`）都会降级为本地占位结果，不向上抛错。

pub mod data_uri;
mod placeholder;
mod types;

pub use placeholder::placeholder_result;
pub use types::{CropBBox, CropSize, DetectData, HealthStatus, ServiceCrop, SummaryData};

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// 允许上传的扩展名
const ALLOWED_EXTENSIONS: [&str; 10] = [
    "jpg", "jpeg", "png", "bmp", "webp", "tif", "tiff", "heic", "heif", "pdf",
];

/// 上传大小上限：10 MiB
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// PDF 等无法在客户端探测尺寸的文档，使用固定的占位尺寸
const FALLBACK_DIMENSIONS: (u32, u32) = (800, 1000);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("文件无效: {0}")]
    InvalidFile(String),

    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),

    #[error("服务端返回失败: {0}")]
    Service(String),

    #[error("响应解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("解码失败: {0}")]
    Decode(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 检测服务客户端
pub struct DetectClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl DetectClient {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<DetectClient, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(DetectClient {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// 上传前的本地校验：扩展名白名单 + 大小上限
    pub fn validate_upload(&self, path: &Path) -> Result<(), ClientError> {
        let ext = file_extension(path);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ClientError::InvalidFile(format!(
                "不支持的文件类型 \"{}\"，支持: {}",
                ext,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        let size = std::fs::metadata(path)
            .map_err(|err| ClientError::InvalidFile(format!("无法读取文件: {}", err)))?
            .len();
        if size > MAX_FILE_SIZE {
            return Err(ClientError::InvalidFile(format!(
                "文件过大 ({} 字节)，上限 {} 字节",
                size, MAX_FILE_SIZE
            )));
        }
        Ok(())
    }

    /// 调用 `/detect`，失败时返回错误（降级逻辑见 [`DetectClient::detect_or_placeholder`]）
    pub fn detect(&self, path: &Path) -> Result<DetectData, ClientError> {
        let url = format!("{}/detect", self.endpoint);
        log::info!("[Client] 上传检测: {} -> {}", path.display(), url);

        let form = reqwest::blocking::multipart::Form::new().file("image", path)?;
        let response = self.http.post(&url).multipart(form).send()?;
        if !response.status().is_success() {
            // 非 2xx 也可能携带 {success:false, error} 负载
            let status = response.status();
            if let Ok(value) = response.json::<Value>() {
                return Err(service_error(&value));
            }
            return Err(ClientError::Service(format!("HTTP {}", status)));
        }

        let value: Value = response.json()?;
        let data: DetectData = parse_payload(value)?;
        log::info!(
            "[Client] 检测完成: {} 个区域, 耗时 {:.0} ms",
            data.count,
            data.processing_time_ms
        );
        Ok(data)
    }

    /// 调用 `/detect`；网络失败或业务失败时记录警告并返回本地占位结果
    pub fn detect_or_placeholder(&self, path: &Path) -> Result<DetectData, ClientError> {
        match self.detect(path) {
            Ok(data) => Ok(data),
            Err(err @ (ClientError::InvalidFile(_) | ClientError::Io(_))) => Err(err),
            Err(err) => {
                log::warn!("[Client] 检测服务不可用，使用占位结果: {}", err);
                let (width, height) = source_dimensions(path);
                Ok(placeholder_result(width, height))
            }
        }
    }

    /// 调用 `/summarize`。失败直接向调用方抛错（需要用户感知）
    pub fn summarize(&self, path: &Path) -> Result<SummaryData, ClientError> {
        let url = format!("{}/summarize", self.endpoint);
        log::info!("[Client] 请求文档摘要: {} -> {}", path.display(), url);

        let form = reqwest::blocking::multipart::Form::new().file("document", path)?;
        let response = self.http.post(&url).multipart(form).send()?;
        if !response.status().is_success() {
            let status = response.status();
            if let Ok(value) = response.json::<Value>() {
                return Err(service_error(&value));
            }
            return Err(ClientError::Service(format!("HTTP {}", status)));
        }
        let value: Value = response.json()?;
        parse_payload(value)
    }

    /// 调用 `/health`
    pub fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = format!("{}/health", self.endpoint);
        let value: Value = self.http.get(&url).send()?.json()?;
        Ok(serde_json::from_value(value)?)
    }
}

/// 解析统一响应格式
///
/// 服务端既可能把数据嵌套在 `data` 下，也可能平铺在顶层，两者都接受。
fn parse_payload<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(service_error(&value));
    }
    let data = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => value,
    };
    Ok(serde_json::from_value(data)?)
}

fn service_error(value: &Value) -> ClientError {
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    ClientError::Service(message.to_string())
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("")
        .to_lowercase()
}

/// 探测源文件尺寸，用于占位结果
///
/// PDF 没有客户端解码路径，读图失败时同样退回固定尺寸。
pub fn source_dimensions(path: &Path) -> (u32, u32) {
    if file_extension(path) == "pdf" {
        return FALLBACK_DIMENSIONS;
    }
    match image::image_dimensions(path) {
        Ok(dims) => dims,
        Err(err) => {
            log::warn!("[Client] 无法探测图像尺寸 ({})，使用默认尺寸", err);
            FALLBACK_DIMENSIONS
        }
    }
}
