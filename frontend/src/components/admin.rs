//! 管理后台：全站统计、CSV 报表、流量概览与全部链接

use crate::auth::{PageTasks, use_auth};
use crate::components::icons::*;
use crate::components::layout::{AppShell, Notice, Toast};
use crate::web::browser::download_text;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shawty_shared::protocol::{
    AdminStatsRequest, AnalyticsOverviewRequest, CsvReportRequest, ListAllLinksRequest,
    RemoveLinkRequest,
};
use shawty_shared::{AdminStats, AnalyticsOverview, NamedCount, OverviewRange, ShortLink};

const REPORT_FILENAME: &str = "shawty-report.csv";

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();

    let stats = RwSignal::new(AdminStats::default());
    let links = RwSignal::new(Vec::<ShortLink>::new());
    let loading = RwSignal::new(true);
    let exporting = RwSignal::new(false);
    let notice = RwSignal::new(Option::<Notice>::None);

    let load_all = move || {
        loading.set(true);
        let api = auth.api();
        tasks.spawn(async move {
            let (stats_res, links_res) = futures::join!(
                api.send(&AdminStatsRequest),
                api.send(&ListAllLinksRequest)
            );
            match stats_res {
                Ok(data) => stats.set(data),
                Err(e) => notice.set(Notice::err(e.user_message("Failed to load statistics"))),
            }
            match links_res {
                Ok(data) => links.set(data),
                Err(e) => notice.set(Notice::err(e.user_message("Failed to load links"))),
            }
            loading.set(false);
        });
    };

    load_all();

    let handle_export = move |_| {
        exporting.set(true);
        let api = auth.api();
        spawn_local(async move {
            match api.send(&CsvReportRequest).await {
                Ok(report) => {
                    download_text(REPORT_FILENAME, "text/csv", &report.0);
                    notice.try_set(Notice::ok("Report downloaded"));
                }
                Err(e) => {
                    notice.try_set(Notice::err(e.user_message("Failed to generate report")));
                }
            }
            exporting.try_set(false);
        });
    };

    let handle_remove = move |short_code: String| {
        let confirmed = window()
            .confirm_with_message(&format!("Remove /{short_code} for its owner?"))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.send(&RemoveLinkRequest { short_code: short_code.clone() }).await {
                Ok(_) => {
                    notice.try_set(Notice::ok("Link removed"));
                    links.try_update(|list| list.retain(|l| l.short_code != short_code));
                }
                Err(e) => {
                    notice.try_set(Notice::err(e.user_message("Failed to remove link")));
                }
            }
        });
    };

    view! {
        <AppShell title="Admin">
            <Toast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Administration"</h2>
                    <p class="text-base-content/70 text-sm">"Site-wide totals and moderation."</p>
                </div>
                <div class="flex gap-2">
                    <button
                        on:click=move |_| load_all()
                        disabled=move || loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                    <button class="btn btn-outline gap-2" on:click=handle_export disabled=move || exporting.get()>
                        <Download attr:class="h-4 w-4" /> "Export CSV"
                    </button>
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary"><Users attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Users"</div>
                    <div class="stat-value text-primary">{move || stats.with(|s| s.total_users)}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-secondary"><LinkIcon attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Links"</div>
                    <div class="stat-value text-secondary">{move || stats.with(|s| s.total_urls)}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-accent"><BarChart attr:class="h-8 w-8" /></div>
                    <div class="stat-title">"Clicks"</div>
                    <div class="stat-value text-accent">{move || stats.with(|s| s.total_clicks)}</div>
                </div>
            </div>

            <OverviewCard />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-6 pb-2">
                        <h3 class="card-title">"All links"</h3>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Short link"</th>
                                    <th class="hidden md:table-cell">"Destination"</th>
                                    <th>"Clicks"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || links.get()
                                    key=|link| (link.id, link.clicks, link.is_active)
                                    children=move |link| {
                                        let code = link.short_code.clone();
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm font-bold">{link.short_code}</td>
                                                <td class="hidden md:table-cell max-w-xs truncate opacity-70">{link.original_url}</td>
                                                <td>{link.clicks}</td>
                                                <td>
                                                    {if link.is_active {
                                                        view! { <span class="badge badge-success badge-outline">"Active"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge-ghost">"Disabled"</span> }.into_any()
                                                    }}
                                                </td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square text-error"
                                                        on:click=move |_| handle_remove(code.clone())
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

/// 全站流量概览，带时间范围切换
#[component]
fn OverviewCard() -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();

    let range = RwSignal::new(OverviewRange::default());
    let overview = RwSignal::new(Option::<AnalyticsOverview>::None);

    Effect::new(move |_| {
        let requested = range.get();
        let api = auth.api();
        tasks.spawn(async move {
            let result = api.send(&AnalyticsOverviewRequest { range: requested }).await;
            if range.get_untracked() != requested {
                return;
            }
            match result {
                Ok(data) => overview.set(Some(data)),
                Err(e) => {
                    leptos::logging::warn!("[Admin] overview failed: {}", e);
                    overview.set(None);
                }
            }
        });
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Traffic overview"</h3>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            if let Some(r) = OverviewRange::ALL.into_iter().find(|r| r.as_str() == value) {
                                range.set(r);
                            }
                        }
                    >
                        {OverviewRange::ALL
                            .into_iter()
                            .map(|r| view! {
                                <option value=r.as_str() selected=move || range.get() == r>{r.as_str()}</option>
                            })
                            .collect_view()}
                    </select>
                </div>

                {move || match overview.get() {
                    None => view! {
                        <p class="text-center py-8 text-base-content/50">"No overview available."</p>
                    }
                        .into_any(),
                    Some(data) => {
                        let total: i64 = data.chart_data.iter().map(|p| p.clicks).sum();
                        let top_urls: Vec<NamedCount> = data
                            .top_urls
                            .iter()
                            .map(|u| NamedCount { name: format!("/{}", u.short_code), value: u.clicks })
                            .collect();
                        view! {
                            <p class="text-sm text-base-content/70">
                                {format!("{total} clicks across {} days", data.chart_data.len())}
                            </p>
                            <div class="grid grid-cols-1 md:grid-cols-3 gap-6 pt-2">
                                <CountList title="Top links" items=top_urls />
                                <CountList title="Referrers" items=data.top_referrers />
                                <CountList title="Devices" items=data.top_devices />
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn CountList(title: &'static str, items: Vec<NamedCount>) -> impl IntoView {
    let empty = items.is_empty();
    view! {
        <div>
            <h4 class="font-semibold mb-2">{title}</h4>
            {empty.then(|| view! { <p class="text-sm text-base-content/50">"No data yet."</p> })}
            <ul class="space-y-1">
                {items
                    .into_iter()
                    .map(|item| view! {
                        <li class="flex justify-between text-sm">
                            <span class="truncate">{item.name}</span>
                            <span class="font-mono">{item.value}</span>
                        </li>
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}
