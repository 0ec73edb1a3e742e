use crate::auth::{PageTasks, use_auth};
use crate::web::router::Link;
use leptos::prelude::*;
use shawty_shared::VerifyEmailRequest;

#[derive(Debug, Clone, PartialEq)]
enum VerifyState {
    Pending,
    Verified(String),
    Failed(String),
}

/// 邮箱验证：进入页面即提交令牌
#[component]
pub fn VerifyEmailPage(token: String) -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();
    let state = RwSignal::new(VerifyState::Pending);

    let api = auth.public_api();
    tasks.spawn(async move {
        let outcome = match api.send(&VerifyEmailRequest { token }).await {
            Ok(resp) => VerifyState::Verified(
                resp.and_then(|r| r.message)
                    .unwrap_or_else(|| "Your email has been verified.".to_string()),
            ),
            Err(e) => VerifyState::Failed(e.user_message("This verification link is invalid or has expired.")),
        };
        state.set(outcome);
    });

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <div class="card-body items-center text-center">
                    {move || match state.get() {
                        VerifyState::Pending => view! {
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                            <p>"Verifying your email..."</p>
                        }
                            .into_any(),
                        VerifyState::Verified(message) => view! {
                            <h2 class="card-title text-success">"Email verified"</h2>
                            <p>{message}</p>
                            <Link to="/login" class="btn btn-primary mt-4">"Log in"</Link>
                        }
                            .into_any(),
                        VerifyState::Failed(message) => view! {
                            <h2 class="card-title text-error">"Verification failed"</h2>
                            <p>{message}</p>
                            <Link to="/" class="btn btn-ghost mt-4">"Back home"</Link>
                        }
                            .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
