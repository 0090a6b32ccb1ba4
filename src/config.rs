use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// 客户端配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
  /// 检测服务地址
  pub endpoint: String,
  /// 请求超时（秒）
  pub timeout_secs: u64,
  /// 导出目录
  pub output_dir: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    AppConfig {
      endpoint: "http://localhost:5000".to_string(),
      timeout_secs: 60,
      output_dir: "outputs".to_string(),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("home dir unavailable")]
  NoHomeDir,
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
  if let Ok(dir) = std::env::var("DOCMARK_CONFIG_DIR") {
    return Ok(PathBuf::from(dir).join("config.json"));
  }
  let base = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
  Ok(base.join(".docmark").join("config.json"))
}

/// 加载配置：文件缺失时用默认值，环境变量优先于文件
pub fn load_config() -> Result<AppConfig, ConfigError> {
  let path = config_path()?;
  let mut config = if path.exists() {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)?
  } else {
    AppConfig::default()
  };

  if let Ok(endpoint) = std::env::var("DOCMARK_ENDPOINT") {
    if !endpoint.trim().is_empty() {
      config.endpoint = endpoint;
    }
  }
  config.timeout_secs = env_u64("DOCMARK_TIMEOUT_SECS", config.timeout_secs);
  Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
  let path = config_path()?;
  if let Some(dir) = path.parent() {
    fs::create_dir_all(dir)?;
  }
  let raw = serde_json::to_string_pretty(config)?;
  fs::write(path, raw)?;
  Ok(())
}

fn env_u64(key: &str, default: u64) -> u64 {
  std::env::var(key)
    .ok()
    .and_then(|v| v.parse::<u64>().ok())
    .unwrap_or(default)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.endpoint, "http://localhost:5000");
    assert_eq!(config.timeout_secs, 60);
  }

  #[test]
  fn test_config_roundtrip_json() {
    let config = AppConfig {
      endpoint: "http://detect.internal:8080".to_string(),
      timeout_secs: 30,
      output_dir: "/tmp/docmark".to_string(),
    };
    let raw = serde_json::to_string(&config).unwrap();
    assert!(raw.contains("timeoutSecs"));
    let back: AppConfig = serde_json::from_str(&raw).unwrap();
    assert_eq!(back.endpoint, config.endpoint);
    assert_eq!(back.timeout_secs, 30);
  }

  #[test]
  fn test_partial_file_uses_defaults() {
    let back: AppConfig = serde_json::from_str(r#"{"endpoint": "http://x:1"}"#).unwrap();
    assert_eq!(back.endpoint, "http://x:1");
    assert_eq!(back.timeout_secs, 60);
    assert_eq!(back.output_dir, "outputs");
  }
}
