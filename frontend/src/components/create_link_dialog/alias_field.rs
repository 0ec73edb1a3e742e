//! 自定义别名输入框
//!
//! 输入停止 500ms 后向后端查询别名是否可用；过期的查询结果会被丢弃。

use crate::auth::use_auth;
use crate::web::Debounce;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::validate;

const CHECK_DELAY_MS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AliasStatus {
    #[default]
    Idle,
    Checking,
    Available,
    Taken,
    Invalid(String),
}

impl AliasStatus {
    /// 是否允许提交（空别名视为不使用别名）
    pub fn blocks_submit(&self) -> bool {
        matches!(self, Self::Checking | Self::Taken | Self::Invalid(_))
    }
}

#[component]
pub fn AliasField(alias: RwSignal<String>, status: RwSignal<AliasStatus>) -> impl IntoView {
    let auth = use_auth();
    let debounce = Debounce::new(CHECK_DELAY_MS);

    let on_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev).trim().to_string();
        alias.set(value.clone());

        if value.is_empty() {
            debounce.cancel();
            status.set(AliasStatus::Idle);
            return;
        }
        if let Err(e) = validate::validate_alias(&value) {
            debounce.cancel();
            status.set(AliasStatus::Invalid(e.to_string()));
            return;
        }

        status.set(AliasStatus::Checking);
        debounce.call(move || {
            let api = auth.public_api();
            spawn_local(async move {
                let next = match api.alias_available(&value).await {
                    Ok(true) => AliasStatus::Available,
                    Ok(false) => AliasStatus::Taken,
                    Err(e) => AliasStatus::Invalid(e.user_message("Could not check alias")),
                };
                // 用户已继续输入时丢弃结果
                if alias.try_get_untracked().as_deref() == Some(value.as_str()) {
                    status.try_set(next);
                }
            });
        });
    };

    view! {
        <div class="form-control">
            <label class="label" for="alias">
                <span class="label-text">"Custom alias (optional)"</span>
            </label>
            <input
                id="alias"
                type="text"
                placeholder="my-campaign"
                on:input=on_input
                prop:value=alias
                class=move || match status.get() {
                    AliasStatus::Available => "input input-bordered input-success",
                    AliasStatus::Taken | AliasStatus::Invalid(_) => "input input-bordered input-error",
                    _ => "input input-bordered",
                }
            />
            <label class="label">
                <span class="label-text-alt">
                    {move || match status.get() {
                        AliasStatus::Idle => String::new(),
                        AliasStatus::Checking => "Checking availability...".to_string(),
                        AliasStatus::Available => "Alias is available".to_string(),
                        AliasStatus::Taken => "Alias is already taken".to_string(),
                        AliasStatus::Invalid(message) => message,
                    }}
                </span>
            </label>
        </div>
    }
}
