//! Canonical mapping from detector class labels to display categories.
//!
//! Both thumbnail paths (service-rendered crops and local crops) resolve
//! labels through this single table, so the two paths can never diverge.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One of the three mark categories the detector is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Signature,
    Stamp,
    QrCode,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Signature, Category::Stamp, Category::QrCode];

    /// Resolve a class label to a category. Labels are canonicalized the
    /// way the detection service normalizes its model class names:
    /// lowercased, `-` and spaces folded to `_`, known aliases accepted.
    pub fn try_from_label(label: &str) -> crate::Result<Category> {
        let canonical = label.trim().to_lowercase().replace(['-', ' '], "_");
        match canonical.as_str() {
            "signature" | "sign" | "autograph" => Ok(Category::Signature),
            "stamp" | "seal" | "stamp_seal" => Ok(Category::Stamp),
            "qr_code" | "qr" | "qrcode" => Ok(Category::QrCode),
            _ => Err(CoreError::UnknownClass(label.to_string())),
        }
    }

    /// Fallback for responses that only carry the numeric model class.
    pub fn from_index(index: u32) -> Option<Category> {
        match index {
            0 => Some(Category::Signature),
            1 => Some(Category::Stamp),
            2 => Some(Category::QrCode),
            _ => None,
        }
    }

    /// Resolve from label first, numeric class second.
    pub fn resolve(label: &str, index: Option<u32>) -> Option<Category> {
        Category::try_from_label(label)
            .ok()
            .or_else(|| index.and_then(Category::from_index))
    }

    /// Canonical class key as used in `count_by_class`.
    pub fn key(self) -> &'static str {
        match self {
            Category::Signature => "signature",
            Category::Stamp => "stamp",
            Category::QrCode => "qr_code",
        }
    }

    /// File-name prefix for exported transparent thumbnails.
    pub fn export_prefix(self) -> &'static str {
        match self {
            Category::Signature => "signature",
            Category::Stamp => "stamp",
            Category::QrCode => "qr",
        }
    }

    /// Archive name for the per-category no-background ZIP.
    pub fn archive_name(self) -> &'static str {
        match self {
            Category::Signature => "signatures_no_bg.zip",
            Category::Stamp => "stamps_no_bg.zip",
            Category::QrCode => "qr_no_bg.zip",
        }
    }

    /// Annotation color (RGBA), matching the web front-end palette.
    pub fn color(self) -> [u8; 4] {
        match self {
            Category::Signature => [0x3b, 0x82, 0xf6, 0xff],
            Category::Stamp => [0x06, 0xb6, 0xd4, 0xff],
            Category::QrCode => [0x10, 0xb9, 0x81, 0xff],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Signature => "Signatures",
            Category::Stamp => "Stamps",
            Category::QrCode => "QR Codes",
        }
    }
}
