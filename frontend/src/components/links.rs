//! 链接管理页：列表、搜索、新建、编辑、启停、二维码与删除

mod qr_modal;

use crate::auth::{PageTasks, use_auth};
use crate::components::create_link_dialog::CreateLinkDialog;
use crate::components::icons::*;
use crate::components::layout::{AppShell, Notice, Toast};
use crate::web::browser::{copy_text, origin};
use qr_modal::QrModal;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::protocol::{DeleteLinkRequest, EditLinkRequest, ListLinksRequest};
use shawty_shared::validate;
use shawty_shared::{ShortLink, UpdateLinkRequest};

const PAGE_SIZE: u32 = 20;

#[component]
pub fn LinksPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();

    let links = RwSignal::new(Vec::<ShortLink>::new());
    let page = RwSignal::new(0u32);
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(Option::<Notice>::None);
    let editing = RwSignal::new(Option::<ShortLink>::None);
    let qr_link = RwSignal::new(Option::<ShortLink>::None);
    let search = RwSignal::new(String::new());

    // 只过滤当前页
    let visible = Memo::new(move |_| {
        let query = search.get();
        links.with(|list| {
            list.iter()
                .filter(|l| l.matches_query(&query))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let load_links = move || {
        loading.set(true);
        let request = ListLinksRequest {
            skip: page.get_untracked() * PAGE_SIZE,
            limit: PAGE_SIZE,
        };
        let api = auth.api();
        tasks.spawn(async move {
            match api.send(&request).await {
                Ok(data) => links.set(data),
                Err(e) => notice.set(Notice::err(e.user_message("Failed to load links"))),
            }
            loading.set(false);
        });
    };

    load_links();

    let go_to_page = move |next: u32| {
        page.set(next);
        load_links();
    };

    // 用服务端返回的记录替换列表中的旧记录
    let replace_link = move |updated: ShortLink| {
        links.update(|list| {
            if let Some(slot) = list.iter_mut().find(|l| l.id == updated.id) {
                *slot = updated;
            }
        });
    };

    let handle_toggle = move |link: ShortLink| {
        let request = EditLinkRequest {
            short_code: link.short_code.clone(),
            changes: UpdateLinkRequest {
                is_active: Some(!link.is_active),
                ..Default::default()
            },
        };
        let api = auth.api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(updated) => {
                    let message = if updated.is_active { "Link enabled" } else { "Link disabled" };
                    notice.try_set(Notice::ok(message));
                    replace_link(updated);
                }
                Err(e) => {
                    notice.try_set(Notice::err(e.user_message("Failed to update link")));
                }
            }
        });
    };

    let handle_delete = move |short_code: String| {
        let confirmed = window()
            .confirm_with_message(&format!("Delete /{short_code}? This cannot be undone."))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.send(&DeleteLinkRequest { short_code: short_code.clone() }).await {
                Ok(_) => {
                    notice.try_set(Notice::ok("Link deleted"));
                    links.try_update(|list| list.retain(|l| l.short_code != short_code));
                }
                Err(e) => {
                    notice.try_set(Notice::err(e.user_message("Failed to delete link")));
                }
            }
        });
    };

    let handle_saved = move |updated: ShortLink| {
        notice.set(Notice::ok("Link updated"));
        replace_link(updated);
    };

    let is_empty = move || visible.with(Vec::is_empty);
    let empty_message = move || {
        if search.with(|q| q.trim().is_empty()) {
            "No links on this page."
        } else {
            "No links match your search."
        }
    };

    view! {
        <AppShell title="Links">
            <Toast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Your links"</h2>
                    <p class="text-base-content/70 text-sm">"Edit, disable or remove your short links."</p>
                </div>
                <div class="flex gap-2">
                    <button
                        on:click=move |_| load_links()
                        disabled=move || loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                    <CreateLinkDialog on_created=move |_: ShortLink| load_links() />
                </div>
            </div>

            <div class="flex flex-wrap items-center justify-between gap-4">
                <label class="input input-bordered flex items-center gap-2 w-full md:max-w-sm">
                    <Search attr:class="h-4 w-4 opacity-60" />
                    <input
                        type="search"
                        class="grow"
                        placeholder="Search by code or destination"
                        prop:value=search
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                </label>
                <span class="text-sm text-base-content/70">
                    {move || format!("Showing {} links", visible.with(Vec::len))}
                </span>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Short link"</th>
                                    <th class="hidden md:table-cell">"Destination"</th>
                                    <th>"Clicks"</th>
                                    <th class="hidden lg:table-cell">"Expires"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || is_empty() && !loading.get()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            {empty_message}
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || is_empty() && loading.get()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span>
                                            " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || visible.get()
                                    key=|link| (link.id, link.is_active, link.clicks, link.max_clicks, link.original_url.clone())
                                    children=move |link| {
                                        let share = link.share_url(&origin());
                                        let code = link.short_code.clone();
                                        let for_toggle = link.clone();
                                        let for_edit = link.clone();
                                        let for_qr = link.clone();
                                        let clicks = match link.max_clicks {
                                            Some(max) => format!("{} / {}", link.clicks, max),
                                            None => link.clicks.to_string(),
                                        };
                                        let expires = link
                                            .expires_at
                                            .map(|t| t.display_date())
                                            .unwrap_or_else(|| "Never".to_string());
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="flex items-center gap-2 font-mono text-sm font-bold">
                                                        {link.is_protected().then(|| view! {
                                                            <Lock attr:class="h-4 w-4 text-warning" />
                                                        })}
                                                        {link.short_code.clone()}
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell max-w-xs truncate opacity-70">
                                                    <a href=link.original_url.clone() target="_blank" rel="noopener" class="link link-hover">
                                                        {link.original_url.clone()}
                                                    </a>
                                                </td>
                                                <td>{clicks}</td>
                                                <td class="hidden lg:table-cell text-sm opacity-70">{expires}</td>
                                                <td>
                                                    <input
                                                        type="checkbox"
                                                        class="toggle toggle-success toggle-sm"
                                                        prop:checked=link.is_active
                                                        on:change=move |_| handle_toggle(for_toggle.clone())
                                                    />
                                                </td>
                                                <td>
                                                    <div class="flex gap-1">
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square"
                                                            title="Copy"
                                                            on:click=move |_| {
                                                                copy_text(&share);
                                                                notice.set(Notice::ok("Copied to clipboard"));
                                                            }
                                                        >
                                                            <Copy attr:class="h-4 w-4" />
                                                        </button>
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square"
                                                            title="QR code"
                                                            on:click=move |_| qr_link.set(Some(for_qr.clone()))
                                                        >
                                                            <QrCode attr:class="h-4 w-4" />
                                                        </button>
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square"
                                                            title="Edit"
                                                            on:click=move |_| editing.set(Some(for_edit.clone()))
                                                        >
                                                            <Pencil attr:class="h-4 w-4" />
                                                        </button>
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square text-error"
                                                            title="Delete"
                                                            on:click=move |_| handle_delete(code.clone())
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" />
                                                        </button>
                                                    </div>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    <div class="flex justify-center p-4">
                        <div class="join">
                            <button
                                class="join-item btn btn-sm"
                                disabled=move || page.get() == 0 || loading.get()
                                on:click=move |_| go_to_page(page.get_untracked().saturating_sub(1))
                            >
                                "«"
                            </button>
                            <button class="join-item btn btn-sm">
                                {move || format!("Page {}", page.get() + 1)}
                            </button>
                            <button
                                class="join-item btn btn-sm"
                                disabled=move || {
                                    loading.get() || links.with(|l| (l.len() as u32) < PAGE_SIZE)
                                }
                                on:click=move |_| go_to_page(page.get_untracked() + 1)
                            >
                                "»"
                            </button>
                        </div>
                    </div>
                </div>
            </div>

            <EditLinkDialog editing=editing on_saved=handle_saved />
            <QrModal showing=qr_link />
        </AppShell>
    }
}

/// 编辑对话框：目标地址、最大点击次数
#[component]
fn EditLinkDialog(
    editing: RwSignal<Option<ShortLink>>,
    #[prop(into)] on_saved: Callback<ShortLink>,
) -> impl IntoView {
    let auth = use_auth();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let url = RwSignal::new(String::new());
    let max_clicks = RwSignal::new(String::new());
    let saving = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    // 打开时用当前记录填充表单
    Effect::new(move |_| {
        let current = editing.get();
        if let Some(link) = &current {
            url.set(link.original_url.clone());
            max_clicks.set(link.max_clicks.map(|n| n.to_string()).unwrap_or_default());
            error_msg.set(None);
        }
        if let Some(dialog) = dialog_ref.get() {
            if current.is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(link) = editing.get_untracked() else {
            return;
        };

        let new_url = url.get().trim().to_string();
        if let Err(e) = validate::validate_url(&new_url) {
            error_msg.set(Some(e.to_string()));
            return;
        }
        let new_max = match validate::parse_max_clicks(&max_clicks.get()) {
            Ok(n) => n,
            Err(e) => {
                error_msg.set(Some(e.to_string()));
                return;
            }
        };

        let request = EditLinkRequest {
            short_code: link.short_code.clone(),
            changes: UpdateLinkRequest {
                original_url: (new_url != link.original_url).then_some(new_url),
                is_active: None,
                max_clicks: new_max,
            },
        };

        saving.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(updated) => {
                    on_saved.try_run(updated);
                    editing.try_set(None);
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to update link")));
                }
            }
            saving.try_set(false);
        });
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| editing.set(None)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    "Edit /"
                    {move || editing.with(|e| e.as_ref().map(|l| l.short_code.clone()).unwrap_or_default())}
                </h3>
                <form on:submit=on_submit class="space-y-4 pt-4">
                    <div class="form-control">
                        <label for="edit_url" class="label">
                            <span class="label-text">"Destination URL"</span>
                        </label>
                        <input id="edit_url" required
                            type="url"
                            class="input input-bordered w-full"
                            prop:value=url
                            on:input=move |ev| url.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label for="edit_max_clicks" class="label">
                            <span class="label-text">"Max clicks"</span>
                        </label>
                        <input id="edit_max_clicks"
                            type="number"
                            min="1"
                            placeholder="Unlimited"
                            class="input input-bordered w-full"
                            prop:value=max_clicks
                            on:input=move |ev| max_clicks.set(event_target_value(&ev))
                        />
                    </div>

                    {move || error_msg.get().map(|msg| view! {
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{msg}</span>
                        </div>
                    })}

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| editing.set(None)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
