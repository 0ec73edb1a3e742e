use crate::components::icons::Download;
use crate::web::browser::{download_qr_png, origin};
use leptos::prelude::*;
use shawty_shared::ShortLink;
use shawty_shared::qr::{ShareQr, png_filename};

/// PNG 中每个模块的像素数
const PNG_SCALE: u32 = 8;

/// 单条链接的二维码弹窗；`showing` 为 `None` 时关闭
#[component]
pub fn QrModal(showing: RwSignal<Option<ShortLink>>) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        let open = showing.with(Option::is_some);
        if let Some(dialog) = dialog_ref.get() {
            if open {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let body = move || {
        showing.get().map(|link| {
            let url = link.share_url(&origin());
            match ShareQr::new(&url) {
                Ok(qr) => {
                    let svg = qr.to_svg(200);
                    let filename = png_filename(&link.short_code);
                    view! {
                        <p class="text-sm text-base-content/70 break-all">"Scan to visit " {url}</p>
                        <div class="flex justify-center bg-white rounded-box p-4 my-4" inner_html=svg></div>
                        <div class="modal-action">
                            <button
                                class="btn btn-primary gap-2"
                                on:click=move |_| download_qr_png(&qr, &filename, PNG_SCALE)
                            >
                                <Download attr:class="h-4 w-4" />
                                "Download PNG"
                            </button>
                        </div>
                    }
                    .into_any()
                }
                Err(e) => view! {
                    <div role="alert" class="alert alert-error text-sm my-4">
                        <span>{e.to_string()}</span>
                    </div>
                }
                .into_any(),
            }
        })
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| showing.set(None)>
            <div class="modal-box max-w-sm">
                <button
                    class="btn btn-sm btn-circle btn-ghost absolute right-2 top-2"
                    on:click=move |_| showing.set(None)
                >
                    "✕"
                </button>
                <h3 class="font-bold text-lg">"QR Code"</h3>
                {body}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
