use crate::auth::use_auth;
use crate::components::icons::Lock;
use crate::components::layout::{ErrorAlert, PublicNavbar};
use crate::web::browser::leave_to;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::protocol::UnlockLinkRequest;

/// 受密码保护的短链：输入密码后跳转
#[component]
pub fn UnlockPage(code: String) -> impl IntoView {
    let auth = use_auth();

    let short_code = StoredValue::new(code);
    let password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let password = password.get();
        if password.is_empty() {
            error_msg.set(Some("Please enter the link password".to_string()));
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);

        let request = UnlockLinkRequest {
            short_code: short_code.get_value(),
            password,
        };
        let api = auth.public_api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(resp) => leave_to(&resp.original_url),
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Incorrect password")));
                }
            }
            is_submitting.try_set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <PublicNavbar />
            <div class="hero py-16">
                <div class="card w-full max-w-md shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="flex flex-col items-center gap-2 text-center">
                            <div class="p-3 bg-warning/10 rounded-2xl text-warning">
                                <Lock attr:class="h-8 w-8" />
                            </div>
                            <h1 class="text-2xl font-bold">"This link is protected"</h1>
                            <p class="text-base-content/70 font-mono">{move || short_code.get_value()}</p>
                        </div>
                        <ErrorAlert message=error_msg />
                        <input
                            type="password"
                            placeholder="Link password"
                            on:input=move |ev| password.set(event_target_value(&ev))
                            prop:value=password
                            class="input input-bordered"
                            required
                        />
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            "Unlock"
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
