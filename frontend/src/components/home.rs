use crate::auth::use_auth;
use crate::components::create_link_dialog::{AliasField, CreatedLink, LinkFormState, OptionsSection};
use crate::components::icons::LinkIcon;
use crate::components::layout::{ErrorAlert, PublicNavbar};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::ShortLink;
use shawty_shared::protocol::AnonymousShortenRequest;

/// 首页：匿名缩短链接
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let state = LinkFormState::new();

    let loading = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let created = RwSignal::new(Option::<ShortLink>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match state.to_request() {
            Ok(request) => AnonymousShortenRequest(request),
            Err(message) => {
                error_msg.set(Some(message));
                return;
            }
        };

        loading.set(true);
        error_msg.set(None);
        created.set(None);
        let api = auth.public_api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(link) => {
                    created.try_set(Some(link));
                    state.reset();
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to shorten link")));
                }
            }
            loading.try_set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <PublicNavbar />
            <div class="hero py-16">
                <div class="hero-content flex-col w-full max-w-3xl">
                    <div class="text-center">
                        <div class="inline-flex p-3 bg-primary/10 rounded-2xl text-primary mb-4">
                            <LinkIcon attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-5xl font-bold">"Shorten your links"</h1>
                        <p class="py-6 text-base-content/70">
                            "Paste a long URL, pick an alias if you like, and share it anywhere."
                        </p>
                    </div>

                    <div class="card w-full shadow-2xl bg-base-100">
                        <form class="card-body space-y-2" on:submit=on_submit>
                            <div class="join w-full">
                                <input
                                    type="url"
                                    required
                                    placeholder="https://example.com/a/very/long/path"
                                    class="input input-bordered join-item w-full"
                                    on:input=move |ev| state.url.set(event_target_value(&ev))
                                    prop:value=move || state.url.get()
                                />
                                <button
                                    class="btn btn-primary join-item"
                                    disabled=move || loading.get() || state.alias_status.get().blocks_submit()
                                >
                                    {move || if loading.get() {
                                        view! { <span class="loading loading-spinner"></span> }.into_any()
                                    } else {
                                        "Shorten".into_any()
                                    }}
                                </button>
                            </div>

                            <AliasField alias=state.alias status=state.alias_status />
                            <OptionsSection state=state />
                            <ErrorAlert message=error_msg />

                            {move || created.get().map(|link| view! { <CreatedLink link=link /> })}
                        </form>
                    </div>

                    <Show when=move || !auth.is_authenticated()>
                        <p class="text-sm text-base-content/70">
                            <Link to="/register" class="link link-primary">"Create an account"</Link>
                            " to manage your links and see analytics."
                        </p>
                    </Show>
                </div>
            </div>
            <footer class="footer footer-center p-4 text-base-content/60">
                <div class="flex gap-4">
                    <Link to="/privacy" class="link link-hover">"Privacy"</Link>
                    <Link to="/terms" class="link link-hover">"Terms"</Link>
                    <Link to="/faq" class="link link-hover">"FAQ"</Link>
                </div>
            </footer>
        </div>
    }
}
