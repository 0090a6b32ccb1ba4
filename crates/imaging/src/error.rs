//! 图像处理错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("图像解码失败: {0}")]
    Decode(String),

    #[error("图像编码失败: {0}")]
    Encode(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}
