//! 零散的浏览器操作：剪贴板、文件下载、整页跳转

use leptos::logging;
use shawty_shared::qr::{QUIET_ZONE, ShareQr};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, HtmlAnchorElement,
    HtmlCanvasElement, Url,
};

/// 离开单页应用，整页跳转到 `url`
pub fn leave_to(url: &str) {
    if let Some(window) = web_sys::window() {
        if window.location().set_href(url).is_err() {
            logging::error!("[Browser] failed to navigate to {}", url);
        }
    }
}

/// 当前页面的 origin，例如 `https://sho.rt`
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// 写入剪贴板（不等待结果）
pub fn copy_text(text: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.navigator().clipboard().write_text(text);
    }
}

/// 以文件形式下载文本内容
pub fn download_text(filename: &str, mime: &str, content: &str) {
    if let Err(e) = try_download(filename, mime, content) {
        logging::error!("[Browser] download failed: {:?}", e);
    }
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn click_download(document: &Document, href: &str, filename: &str) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(href);
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}

fn try_download(filename: &str, mime: &str, content: &str) -> Result<(), JsValue> {
    let document = document()?;

    let parts = Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    click_download(&document, &url, filename)?;

    Url::revoke_object_url(&url)
}

/// 把二维码绘制到离屏 canvas 并下载为 PNG，每个模块 `scale` 像素
pub fn download_qr_png(qr: &ShareQr, filename: &str, scale: u32) {
    if let Err(e) = try_download_qr(qr, filename, scale) {
        logging::error!("[Browser] QR download failed: {:?}", e);
    }
}

fn try_download_qr(qr: &ShareQr, filename: &str, scale: u32) -> Result<(), JsValue> {
    let document = document()?;
    let side = qr.width_with_quiet_zone() as u32 * scale;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(side);
    canvas.set_height(side);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(0.0, 0.0, f64::from(side), f64::from(side));
    ctx.set_fill_style_str("#000000");
    let cell = f64::from(scale);
    for (x, y) in qr.dark_modules() {
        ctx.fill_rect(
            (x + QUIET_ZONE) as f64 * cell,
            (y + QUIET_ZONE) as f64 * cell,
            cell,
            cell,
        );
    }

    let data_url = canvas.to_data_url_with_type("image/png")?;
    click_download(&document, &data_url, filename)
}
