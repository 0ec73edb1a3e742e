//! 忘记密码 / 重置密码

use crate::auth::use_auth;
use crate::components::layout::ErrorAlert;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::validate;
use shawty_shared::{ForgotPasswordRequest, ResetPasswordRequest};
use urlencoding::encode;

const RESET_SENT: &str = "If an account exists for that email, a reset link is on its way.";
const RESET_DONE: &str = "Password updated. You can now log in.";

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();

    let email = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let sent = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get();
        if let Err(e) = validate::validate_email(&email) {
            error_msg.set(Some(e.to_string()));
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);

        let api = auth.public_api();
        spawn_local(async move {
            match api.send(&ForgotPasswordRequest { email }).await {
                Ok(_) => {
                    sent.try_set(true);
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Could not send reset email")));
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Reset your password"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || !sent.get()
                        fallback=|| view! {
                            <div class="card-body">
                                <div role="status" class="alert alert-success text-sm">
                                    <span>{RESET_SENT}</span>
                                </div>
                                <Link to="/login" class="btn btn-ghost">"Back to log in"</Link>
                            </div>
                        }
                    >
                        <form class="card-body" on:submit=on_submit>
                            <ErrorAlert message=error_msg />
                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                                "Send reset link"
                            </button>
                            <Link to="/login" class="link link-hover text-sm text-center">"Back to log in"</Link>
                        </form>
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let token = Memo::new(move |_| router.query_param("token").filter(|t| !t.is_empty()));
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = token.get() else {
            error_msg.set(Some("This reset link is invalid or incomplete".to_string()));
            return;
        };
        let new_password = password.get();
        if let Err(e) = validate::validate_new_password(&new_password, &confirm.get()) {
            error_msg.set(Some(e.to_string()));
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);

        let api = auth.public_api();
        spawn_local(async move {
            let request = ResetPasswordRequest {
                token,
                new_password,
            };
            match api.send(&request).await {
                Ok(_) => router.navigate(&format!("/login?message={}", encode(RESET_DONE))),
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Could not reset password")));
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Choose a new password"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || token.get().is_none()>
                            <div role="alert" class="alert alert-warning text-sm py-2">
                                <span>"This reset link is missing its token. Request a new one."</span>
                            </div>
                        </Show>
                        <ErrorAlert message=error_msg />
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"New password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm">
                                <span class="label-text">"Confirm new password"</span>
                            </label>
                            <input
                                id="confirm"
                                type="password"
                                on:input=move |ev| confirm.set(event_target_value(&ev))
                                prop:value=confirm
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <button
                            class="btn btn-primary mt-4"
                            disabled=move || is_submitting.get() || token.get().is_none()
                        >
                            "Update password"
                        </button>
                        <Link to="/forgot-password" class="link link-hover text-sm text-center">
                            "Request a new link"
                        </Link>
                    </form>
                </div>
            </div>
        </div>
    }
}
