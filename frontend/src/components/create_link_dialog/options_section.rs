//! 高级选项表单组件
//!
//! 密码保护、过期时间与最大点击次数；默认折叠。

use leptos::prelude::*;

use super::form_state::LinkFormState;

#[component]
pub fn OptionsSection(state: LinkFormState) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label cursor-pointer">
                <span class="label-text font-bold">"Advanced options"</span>
                <input type="checkbox" class="toggle toggle-primary"
                    prop:checked=move || state.show_options.get()
                    on:change=move |ev| state.show_options.set(event_target_checked(&ev))
                />
            </label>
        </div>

        // 仅在展开时渲染
        <Show when=move || state.show_options.get()>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4 bg-base-200 p-4 rounded-lg">
                <div class="form-control">
                    <label for="link_password" class="label">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input id="link_password"
                        type="password"
                        placeholder="Leave empty for none"
                        class="input input-bordered w-full"
                        prop:value=move || state.password.get()
                        on:input=move |ev| state.password.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label for="link_expires" class="label">
                        <span class="label-text">"Expires at"</span>
                    </label>
                    <input id="link_expires"
                        type="datetime-local"
                        class="input input-bordered w-full"
                        prop:value=move || state.expires_at.get()
                        on:input=move |ev| state.expires_at.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label for="link_max_clicks" class="label">
                        <span class="label-text">"Max clicks"</span>
                    </label>
                    <input id="link_max_clicks"
                        type="number"
                        min="1"
                        placeholder="Unlimited"
                        class="input input-bordered w-full"
                        prop:value=move || state.max_clicks.get()
                        on:input=move |ev| state.max_clicks.set(event_target_value(&ev))
                    />
                </div>
            </div>
        </Show>
    }
}
