mod commands;
mod config;
mod export;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docmark", version, about = "Document mark detection client (signatures, stamps, QR codes)")]
struct Cli {
  /// 检测服务地址（覆盖配置文件与环境变量）
  #[arg(long, global = true)]
  endpoint: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// 上传文档并取回检测结果
  Detect {
    /// 图像或 PDF 文件
    file: PathBuf,
    /// 导出目录（默认取配置中的 outputDir）
    #[arg(long)]
    out: Option<PathBuf>,
    /// 导出标注图 PNG
    #[arg(long)]
    annotated: bool,
    /// 导出结构化 JSON
    #[arg(long)]
    json: bool,
    /// 导出各类别透明背景缩略图 ZIP
    #[arg(long)]
    transparent: bool,
  },
  /// 生成文档摘要
  Summarize {
    /// 图像或 PDF 文件
    file: PathBuf,
  },
  /// 检查检测服务状态
  Health,
  /// 查看或修改本地配置
  Config {
    /// 设置检测服务地址
    #[arg(long)]
    set_endpoint: Option<String>,
    /// 设置请求超时（秒）
    #[arg(long)]
    set_timeout: Option<u64>,
    /// 设置导出目录
    #[arg(long)]
    set_output_dir: Option<String>,
  },
}

fn main() -> anyhow::Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let cli = Cli::parse();
  let mut config = config::load_config()?;
  if let Some(endpoint) = cli.endpoint {
    config.endpoint = endpoint;
  }

  match cli.command {
    Commands::Detect {
      file,
      out,
      annotated,
      json,
      transparent,
    } => commands::run_detect(&config, &file, out, annotated, json, transparent),
    Commands::Summarize { file } => commands::run_summarize(&config, &file),
    Commands::Health => commands::run_health(&config),
    Commands::Config {
      set_endpoint,
      set_timeout,
      set_output_dir,
    } => commands::run_config(set_endpoint, set_timeout, set_output_dir),
  }
}
