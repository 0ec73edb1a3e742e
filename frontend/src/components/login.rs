use crate::auth::use_auth;
use crate::components::icons::ShieldCheck;
use crate::components::layout::ErrorAlert;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::validate;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    // 注册、重置密码等页面跳转过来时携带的提示
    let info_msg = move || router.query_param("message");

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Err(e) = validate::validate_email(&email.get()) {
            error_msg.set(Some(e.to_string()));
            return;
        }
        if password.get().is_empty() {
            error_msg.set(Some("Please enter your password".to_string()));
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);

        let session = auth.session();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            // 成功后由路由守卫跳转到 next 目标，本页可能已被卸载
            if let Err(message) = session.login(&email, &password).await {
                error_msg.try_set(Some(message));
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Welcome back"</h1>
                        <p class="text-base-content/70">"Log in to manage your short links"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || info_msg().map(|msg| view! {
                            <div role="status" class="alert alert-info text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}
                        <ErrorAlert message=error_msg />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                                <Link to="/forgot-password" class="label-text-alt link link-hover">
                                    "Forgot password?"
                                </Link>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to="/register" class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
