//! data URI 编解码
//!
//! 服务端以 `data:image/jpeg;base64,...` 形式内嵌图像。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::ClientError;

/// 把 PNG 字节编码为 data URI
pub fn encode_png(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// 解码 data URI，返回原始图像字节
pub fn decode(uri: &str) -> Result<Vec<u8>, ClientError> {
    let payload = match uri.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => payload,
        _ => return Err(ClientError::Decode("不是合法的 data URI".to_string())),
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|err| ClientError::Decode(format!("base64 解码失败: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let bytes = b"\x89PNG\r\n\x1a\n fake";
        let uri = encode_png(bytes);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_decode_jpeg_uri() {
        assert_eq!(decode("data:image/jpeg;base64,QUJD").unwrap(), b"ABC");
    }

    #[test]
    fn test_decode_rejects_plain_strings() {
        assert!(decode("hello world").is_err());
        assert!(decode("http://example.com/image.png").is_err());
    }
}
