//! 短链二维码
//!
//! 使用最高纠错级别（H）编码分享地址。页面上以 SVG 显示，
//! 下载时由浏览器按模块矩阵绘制到 canvas 再导出 PNG。

use qrcode::render::svg;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

/// 静区宽度（模块数）
pub const QUIET_ZONE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("cannot encode QR code: {0}")]
    Encode(String),
}

/// 一个已编码的二维码
#[derive(Clone)]
pub struct ShareQr {
    code: QrCode,
}

impl ShareQr {
    pub fn new(text: &str) -> Result<Self, QrError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)
            .map_err(|e| QrError::Encode(e.to_string()))?;
        Ok(Self { code })
    }

    /// 每边的模块数（不含静区）
    pub fn width(&self) -> usize {
        self.code.width()
    }

    /// 含静区的边长
    pub fn width_with_quiet_zone(&self) -> usize {
        self.width() + 2 * QUIET_ZONE
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.width() && self.code[(x, y)] == Color::Dark
    }

    /// 所有深色模块的坐标，按行优先
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width();
        (0..width)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_dark(x, y))
    }

    /// 至少 `size` 像素见方的 SVG，带静区
    pub fn to_svg(&self, size: u32) -> String {
        self.code
            .render::<svg::Color>()
            .min_dimensions(size, size)
            .quiet_zone(true)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build()
    }
}

/// 下载文件名：`qrcode-<short_code>.png`
pub fn png_filename(short_code: &str) -> String {
    format!("qrcode-{short_code}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_share_url() {
        let qr = ShareQr::new("https://sho.rt/abc123").unwrap();
        // 版本 1 为 21 模块，H 级纠错下这个地址需要更大的版本
        assert!(qr.width() > 21);
        assert_eq!(qr.width() % 4, 1);
        assert_eq!(qr.width_with_quiet_zone(), qr.width() + 8);
    }

    #[test]
    fn finder_pattern_corners_are_dark() {
        let qr = ShareQr::new("https://sho.rt/abc123").unwrap();
        let last = qr.width() - 1;
        assert!(qr.is_dark(0, 0));
        assert!(qr.is_dark(last, 0));
        assert!(qr.is_dark(0, last));
        assert!(!qr.is_dark(qr.width(), 0));
        assert!(qr.dark_modules().any(|(x, y)| (x, y) == (0, 0)));
        assert!(qr.dark_modules().count() < qr.width() * qr.width());
    }

    #[test]
    fn renders_svg() {
        let svg = ShareQr::new("https://sho.rt/abc123").unwrap().to_svg(200);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let huge = "x".repeat(4000);
        assert!(matches!(ShareQr::new(&huge), Err(QrError::Encode(_))));
    }

    #[test]
    fn filename_uses_short_code() {
        assert_eq!(png_filename("abc123"), "qrcode-abc123.png");
    }
}
