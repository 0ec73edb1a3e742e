//! 创建短链对话框
//!
//! 表单状态、别名输入与高级选项拆分为子模块；首页的匿名缩短表单复用同一套组件。

mod alias_field;
mod form_state;
mod options_section;

pub use alias_field::{AliasField, AliasStatus};
pub use form_state::LinkFormState;
pub use options_section::OptionsSection;

use crate::auth::use_auth;
use crate::components::icons::{Copy, Plus};
use crate::web::browser::{copy_text, origin};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::ShortLink;

#[component]
pub fn CreateLinkDialog(#[prop(into)] on_created: Callback<ShortLink>) -> impl IntoView {
    let auth = use_auth();
    let state = LinkFormState::new();

    let open = RwSignal::new(false);
    let loading = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let created = RwSignal::new(Option::<ShortLink>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let close = move || {
        open.set(false);
        state.reset();
        error_msg.set(None);
        created.set(None);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match state.to_request() {
            Ok(request) => request,
            Err(message) => {
                error_msg.set(Some(message));
                return;
            }
        };

        loading.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(link) => {
                    on_created.try_run(link.clone());
                    created.try_set(Some(link));
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to create link")));
                }
            }
            loading.try_set(false);
        });
    };

    view! {
        <button class="btn btn-primary gap-2" on:click=move |_| open.set(true)>
            <Plus attr:class="h-4 w-4" /> "New link"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| close()>
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">"Create a short link"</h3>

                {move || match created.get() {
                    Some(link) => view! {
                        <CreatedLink link=link />
                        <div class="modal-action">
                            <button type="button" class="btn btn-primary" on:click=move |_| close()>
                                "Done"
                            </button>
                        </div>
                    }
                        .into_any(),
                    None => view! {
                        <form on:submit=on_submit class="space-y-4 pt-4">
                            <div class="form-control">
                                <label for="original_url" class="label">
                                    <span class="label-text">"Destination URL"</span>
                                </label>
                                <input id="original_url" required
                                    type="url"
                                    placeholder="https://example.com/a/very/long/path"
                                    on:input=move |ev| state.url.set(event_target_value(&ev))
                                    prop:value=move || state.url.get()
                                    class="input input-bordered w-full"
                                />
                            </div>

                            <AliasField alias=state.alias status=state.alias_status />
                            <OptionsSection state=state />

                            {move || error_msg.get().map(|msg| view! {
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{msg}</span>
                                </div>
                            })}

                            <div class="modal-action">
                                <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                                    "Cancel"
                                </button>
                                <button
                                    type="submit"
                                    class="btn btn-primary"
                                    disabled=move || loading.get() || state.alias_status.get().blocks_submit()
                                >
                                    {move || if loading.get() {
                                        view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                                    } else {
                                        "Create".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    }
                        .into_any(),
                }}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

/// 新建成功后的结果卡片：完整短链与复制按钮
#[component]
pub fn CreatedLink(link: ShortLink) -> impl IntoView {
    let url = link.share_url(&origin());
    let copied = RwSignal::new(false);
    let target = url.clone();

    view! {
        <div class="bg-base-200 rounded-lg p-4 mt-4 space-y-2">
            <p class="text-sm text-base-content/70">"Your short link is ready"</p>
            <div class="join w-full">
                <input class="input input-bordered join-item w-full font-mono" readonly prop:value=url />
                <button
                    type="button"
                    class="btn btn-primary join-item gap-2"
                    on:click=move |_| {
                        copy_text(&target);
                        copied.set(true);
                    }
                >
                    <Copy attr:class="h-4 w-4" />
                    {move || if copied.get() { "Copied" } else { "Copy" }}
                </button>
            </div>
            <p class="text-xs text-base-content/50 truncate">{link.original_url}</p>
        </div>
    }
}
