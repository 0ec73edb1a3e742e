use crate::auth::{PageTasks, use_auth};
use crate::components::create_link_dialog::CreateLinkDialog;
use crate::components::icons::*;
use crate::components::layout::{AppShell, Notice, Toast};
use crate::web::browser::{copy_text, origin};
use crate::web::router::Link;
use leptos::prelude::*;
use shawty_shared::protocol::DashboardStatsRequest;
use shawty_shared::{DashboardStats, ShortLink};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();

    let stats = RwSignal::new(DashboardStats::default());
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(Option::<Notice>::None);

    let load_stats = move || {
        loading.set(true);
        let api = auth.api();
        tasks.spawn(async move {
            match api.send(&DashboardStatsRequest).await {
                Ok(data) => stats.set(data),
                Err(e) => notice.set(Notice::err(e.user_message("Failed to load dashboard"))),
            }
            loading.set(false);
        });
    };

    // 初始加载
    load_stats();

    let handle_created = move |_link: ShortLink| {
        notice.set(Notice::ok("Link created"));
        load_stats();
    };

    let greeting = move || {
        auth.snapshot
            .with(|s| s.user.as_ref().map(|u| u.display_name().to_string()))
            .unwrap_or_default()
    };
    let recent_count = move || stats.with(|s| s.recent_links.len());

    view! {
        <AppShell title="Dashboard">
            <Toast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Welcome back, " {greeting}</h2>
                    <p class="text-base-content/70 text-sm">"Here is how your links are doing."</p>
                </div>
                <div class="flex gap-2">
                    <button
                        on:click=move |_| load_stats()
                        disabled=move || loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                    <CreateLinkDialog on_created=handle_created />
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <BarChart attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Total clicks"</div>
                    <div class="stat-value text-primary">{move || stats.with(|s| s.total_clicks)}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-success">
                        <LinkIcon attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Active links"</div>
                    <div class="stat-value text-success">{move || stats.with(|s| s.active_links)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Recent links"</div>
                    <div class="stat-value text-secondary">{recent_count}</div>
                    <div class="stat-desc">
                        <Link to="/links" class="link link-hover">"Manage all links"</Link>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-6 pb-2">
                        <h3 class="card-title">"Recent links"</h3>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Short link"</th>
                                    <th class="hidden md:table-cell">"Destination"</th>
                                    <th>"Clicks"</th>
                                    <th class="hidden md:table-cell">"Created"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || recent_count() == 0 && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "No links yet. Create one to get started."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loading.get() && recent_count() == 0>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span>
                                            " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || stats.with(|s| s.recent_links.clone())
                                    key=|link| (link.id, link.clicks)
                                    children=move |link| {
                                        let share = link.share_url(&origin());
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm font-bold">{link.short_code}</td>
                                                <td class="hidden md:table-cell max-w-xs truncate opacity-70">
                                                    {link.original_url}
                                                </td>
                                                <td>{link.clicks}</td>
                                                <td class="hidden md:table-cell text-sm opacity-70">
                                                    {link.created_at.display_date()}
                                                </td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square"
                                                        on:click=move |_| {
                                                            copy_text(&share);
                                                            notice.set(Notice::ok("Copied to clipboard"));
                                                        }
                                                    >
                                                        <Copy attr:class="h-4 w-4" />
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
