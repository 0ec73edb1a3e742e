//! 用户管理：列表、搜索、新建、启停、授予管理员、删除

use crate::auth::{PageTasks, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AppShell, ErrorAlert, Notice, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::protocol::{DeleteUserRequest, EditUserRequest, ListUsersRequest};
use shawty_shared::validate;
use shawty_shared::{AdminCreateUser, AdminUpdateUser, UserRecord};

/// 按邮箱或姓名过滤（不区分大小写）
fn matches_query(user: &UserRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    user.email.to_lowercase().contains(&query)
        || user
            .full_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&query))
}

#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();

    let users = RwSignal::new(Vec::<UserRecord>::new());
    let query = RwSignal::new(String::new());
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(Option::<Notice>::None);

    let load_users = move || {
        loading.set(true);
        let api = auth.api();
        tasks.spawn(async move {
            match api.send(&ListUsersRequest).await {
                Ok(data) => users.set(data),
                Err(e) => notice.set(Notice::err(e.user_message("Failed to load users"))),
            }
            loading.set(false);
        });
    };

    load_users();

    let filtered = Memo::new(move |_| {
        let query = query.get();
        users.with(|list| {
            list.iter()
                .filter(|u| matches_query(u, &query))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    let apply_change = move |user_id: i64, changes: AdminUpdateUser, done: &'static str| {
        let api = auth.api();
        spawn_local(async move {
            match api.send(&EditUserRequest { user_id, changes }).await {
                Ok(updated) => {
                    notice.try_set(Notice::ok(done));
                    users.try_update(|list| {
                        if let Some(slot) = list.iter_mut().find(|u| u.id == updated.id) {
                            *slot = updated;
                        }
                    });
                }
                Err(e) => {
                    notice.try_set(Notice::err(e.user_message("Failed to update user")));
                }
            }
        });
    };

    let handle_delete = move |user: UserRecord| {
        let confirmed = window()
            .confirm_with_message(&format!("Delete {} and all of their links?", user.email))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let api = auth.api();
        let user_id = user.id;
        spawn_local(async move {
            match api.send(&DeleteUserRequest { user_id }).await {
                Ok(_) => {
                    notice.try_set(Notice::ok("User deleted"));
                    users.try_update(|list| list.retain(|u| u.id != user_id));
                }
                Err(e) => {
                    notice.try_set(Notice::err(e.user_message("Failed to delete user")));
                }
            }
        });
    };

    let handle_created = move |user: UserRecord| {
        notice.set(Notice::ok("User created"));
        users.update(|list| list.push(user));
    };

    // 当前管理员不能对自己降级或删除
    let self_id = move || auth.snapshot.with(|s| s.user.as_ref().map(|u| u.id));

    view! {
        <AppShell title="Users">
            <Toast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Users"</h2>
                    <p class="text-base-content/70 text-sm">
                        {move || format!("{} of {} users", filtered.with(Vec::len), users.with(Vec::len))}
                    </p>
                </div>
                <div class="flex gap-2">
                    <input
                        type="search"
                        placeholder="Search by email or name"
                        class="input input-bordered input-sm w-64"
                        prop:value=query
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                    <button
                        on:click=move |_| load_users()
                        disabled=move || loading.get()
                        class="btn btn-ghost btn-circle btn-sm"
                    >
                        <RefreshCw attr:class=move || {
                            if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" }
                        } />
                    </button>
                    <CreateUserDialog on_created=handle_created />
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"User"</th>
                                    <th class="hidden md:table-cell">"Joined"</th>
                                    <th>"Active"</th>
                                    <th>"Admin"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || filtered.with(Vec::is_empty) && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "No users match your search."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || filtered.get()
                                    key=|u| (u.id, u.is_active, u.is_superuser, u.email.clone())
                                    children=move |user| {
                                        let id = user.id;
                                        let is_self = self_id() == Some(id);
                                        let active = user.is_active;
                                        let superuser = user.is_superuser;
                                        let for_delete = user.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="font-bold">{user.display_name().to_string()}</div>
                                                    <div class="text-sm opacity-60">{user.email.clone()}</div>
                                                </td>
                                                <td class="hidden md:table-cell text-sm opacity-70">
                                                    {user.created_at.map(|t| t.display_date()).unwrap_or_default()}
                                                </td>
                                                <td>
                                                    <input type="checkbox" class="toggle toggle-success toggle-sm"
                                                        prop:checked=active
                                                        disabled=is_self
                                                        on:change=move |_| apply_change(
                                                            id,
                                                            AdminUpdateUser { is_active: Some(!active), ..Default::default() },
                                                            if active { "User disabled" } else { "User enabled" },
                                                        )
                                                    />
                                                </td>
                                                <td>
                                                    <input type="checkbox" class="toggle toggle-primary toggle-sm"
                                                        prop:checked=superuser
                                                        disabled=is_self
                                                        on:change=move |_| apply_change(
                                                            id,
                                                            AdminUpdateUser { is_superuser: Some(!superuser), ..Default::default() },
                                                            if superuser { "Admin rights revoked" } else { "Admin rights granted" },
                                                        )
                                                    />
                                                </td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square text-error"
                                                        disabled=is_self
                                                        on:click=move |_| handle_delete(for_delete.clone())
                                                    >
                                                        <Trash2 attr:class="h-4 w-4" />
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}

#[component]
fn CreateUserDialog(#[prop(into)] on_created: Callback<UserRecord>) -> impl IntoView {
    let auth = use_auth();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let open = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_superuser = RwSignal::new(false);

    let reset_form = move || {
        full_name.set(String::new());
        email.set(String::new());
        password.set(String::new());
        is_superuser.set(false);
        error_msg.set(None);
    };

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

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let new_email = email.get().trim().to_string();
        let new_password = password.get();
        if let Err(e) = validate::validate_email(&new_email)
            .and_then(|_| validate::validate_password(&new_password))
        {
            error_msg.set(Some(e.to_string()));
            return;
        }

        let request = AdminCreateUser {
            full_name: full_name.get().trim().to_string(),
            email: new_email,
            password: new_password,
            is_superuser: is_superuser.get(),
            is_active: true,
        };

        saving.set(true);
        error_msg.set(None);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(user) => {
                    on_created.try_run(user);
                    open.try_set(false);
                }
                Err(e) => {
                    error_msg.try_set(Some(e.user_message("Failed to create user")));
                }
            }
            saving.try_set(false);
        });
    };

    view! {
        <button class="btn btn-primary btn-sm gap-2" on:click=move |_| open.set(true)>
            <Plus attr:class="h-4 w-4" /> "New user"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| {
            open.set(false);
            reset_form();
        }>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Create user"</h3>
                <form on:submit=on_submit class="space-y-4 pt-4">
                    <ErrorAlert message=error_msg />
                    <input type="text" placeholder="Full name" class="input input-bordered w-full"
                        prop:value=full_name
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                    />
                    <input type="email" required placeholder="Email" class="input input-bordered w-full"
                        prop:value=email
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input type="password" required placeholder="Initial password" class="input input-bordered w-full"
                        prop:value=password
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <label class="label cursor-pointer">
                        <span class="label-text">"Administrator"</span>
                        <input type="checkbox" class="toggle toggle-primary"
                            prop:checked=is_superuser
                            on:change=move |ev| is_superuser.set(event_target_checked(&ev))
                        />
                    </label>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Create"</button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, full_name: Option<&str>) -> UserRecord {
        UserRecord {
            id: 1,
            email: email.to_string(),
            full_name: full_name.map(str::to_string),
            is_active: true,
            is_superuser: false,
            bio: None,
            created_at: None,
        }
    }

    #[test]
    fn test_search_matches_email_and_name_case_insensitively() {
        let u = user("Ada@Example.com", Some("Ada Lovelace"));
        assert!(matches_query(&u, ""));
        assert!(matches_query(&u, "  "));
        assert!(matches_query(&u, "example"));
        assert!(matches_query(&u, "LOVELACE"));
        assert!(!matches_query(&u, "turing"));
    }

    #[test]
    fn test_search_without_full_name() {
        let u = user("grace@navy.mil", None);
        assert!(matches_query(&u, "grace"));
        assert!(!matches_query(&u, "hopper"));
    }
}
