//! 账户设置：个人资料、修改密码、删除账户

use crate::auth::use_auth;
use crate::components::icons::{ShieldCheck, Trash2};
use crate::components::layout::{AppShell, ErrorAlert, Notice, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::validate;
use shawty_shared::{DeleteAccountRequest, UpdateProfileRequest};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let notice = RwSignal::new(Option::<Notice>::None);

    view! {
        <AppShell title="Settings">
            <Toast notice=notice />
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <ProfileCard notice=notice />
                <PasswordCard notice=notice />
            </div>
            <DangerZone />
        </AppShell>
    }
}

#[component]
fn ProfileCard(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let auth = use_auth();
    let current = auth.snapshot.get_untracked().user;

    let full_name = RwSignal::new(
        current.as_ref().and_then(|u| u.full_name.clone()).unwrap_or_default(),
    );
    let email = RwSignal::new(current.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let bio = RwSignal::new(current.as_ref().and_then(|u| u.bio.clone()).unwrap_or_default());
    let saving = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let new_email = email.get().trim().to_string();
        if let Err(e) = validate::validate_email(&new_email) {
            error_msg.set(Some(e.to_string()));
            return;
        }

        let request = UpdateProfileRequest {
            full_name: Some(full_name.get().trim().to_string()),
            email: Some(new_email),
            bio: Some(bio.get()),
            ..Default::default()
        };

        saving.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(_) => {
                    notice.try_set(Notice::ok("Profile updated"));
                    // 重新拉取用户信息，刷新导航栏等处的展示
                    auth.refresh();
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to update profile")));
                }
            }
            saving.try_set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">"Profile"</h3>
                <ErrorAlert message=error_msg />
                <div class="form-control">
                    <label class="label" for="full_name"><span class="label-text">"Full name"</span></label>
                    <input id="full_name" type="text" class="input input-bordered"
                        prop:value=full_name
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="email"><span class="label-text">"Email"</span></label>
                    <input id="email" type="email" required class="input input-bordered"
                        prop:value=email
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="bio"><span class="label-text">"Bio"</span></label>
                    <textarea id="bio" class="textarea textarea-bordered" rows="3"
                        prop:value=bio
                        on:input=move |ev| bio.set(event_target_value(&ev))
                    ></textarea>
                </div>
                <div class="card-actions justify-end">
                    <button class="btn btn-primary" disabled=move || saving.get()>"Save profile"</button>
                </div>
            </form>
        </div>
    }
}

#[component]
fn PasswordCard(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let auth = use_auth();

    let current_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let saving = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let current = current_password.get();
        let password = new_password.get();
        if current.is_empty() {
            error_msg.set(Some("Please enter your current password".to_string()));
            return;
        }
        if let Err(e) = validate::validate_new_password(&password, &confirmation.get()) {
            error_msg.set(Some(e.to_string()));
            return;
        }

        let request = UpdateProfileRequest {
            password: Some(password),
            current_password: Some(current),
            ..Default::default()
        };

        saving.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(_) => {
                    notice.try_set(Notice::ok("Password changed"));
                    current_password.try_set(String::new());
                    new_password.try_set(String::new());
                    confirmation.try_set(String::new());
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to change password")));
                }
            }
            saving.try_set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title gap-2"><ShieldCheck attr:class="h-5 w-5" />"Password"</h3>
                <ErrorAlert message=error_msg />
                <input type="password" placeholder="Current password" class="input input-bordered"
                    prop:value=current_password
                    on:input=move |ev| current_password.set(event_target_value(&ev))
                />
                <input type="password" placeholder="New password" class="input input-bordered"
                    prop:value=new_password
                    on:input=move |ev| new_password.set(event_target_value(&ev))
                />
                <input type="password" placeholder="Confirm new password" class="input input-bordered"
                    prop:value=confirmation
                    on:input=move |ev| confirmation.set(event_target_value(&ev))
                />
                <div class="card-actions justify-end">
                    <button class="btn btn-primary" disabled=move || saving.get()>"Change password"</button>
                </div>
            </form>
        </div>
    }
}

/// 删除账户；成功后注销，由路由守卫跳转到登录页
#[component]
fn DangerZone() -> impl IntoView {
    let auth = use_auth();

    let password = RwSignal::new(String::new());
    let deleting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let password = password.get();
        if password.is_empty() {
            error_msg.set(Some("Please enter your password to confirm".to_string()));
            return;
        }
        let confirmed = window()
            .confirm_with_message("Delete your account and all of your links? This cannot be undone.")
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        deleting.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&DeleteAccountRequest { password }).await {
                Ok(_) => auth.logout(),
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to delete account")));
                    deleting.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl border border-error/30">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title text-error gap-2"><Trash2 attr:class="h-5 w-5" />"Delete account"</h3>
                <p class="text-sm text-base-content/70">
                    "All of your links and their analytics will be removed permanently."
                </p>
                <ErrorAlert message=error_msg />
                <div class="join">
                    <input type="password" placeholder="Password" class="input input-bordered join-item w-full"
                        prop:value=password
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="btn btn-error join-item" disabled=move || deleting.get()>
                        "Delete account"
                    </button>
                </div>
            </form>
        </div>
    }
}
