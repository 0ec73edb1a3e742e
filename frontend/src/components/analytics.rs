use crate::auth::{PageTasks, use_auth};
use crate::components::layout::{AppShell, Notice, Toast};
use leptos::prelude::*;
use shawty_shared::protocol::AnalyticsRequest;
use shawty_shared::{AnalyticsDashboard, ChartPoint, NamedCount, TimeRange};

fn range_label(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Day => "Last 24 hours",
        TimeRange::Week => "Last 7 days",
        TimeRange::Month => "Last 30 days",
        TimeRange::Quarter => "Last 90 days",
    }
}

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = PageTasks::new();

    let range = RwSignal::new(TimeRange::default());
    let data = RwSignal::new(AnalyticsDashboard::default());
    let loading = RwSignal::new(true);
    let notice = RwSignal::new(Option::<Notice>::None);

    // 时间范围变化时重新加载
    Effect::new(move |_| {
        let requested = range.get();
        loading.set(true);
        let api = auth.api();
        tasks.spawn(async move {
            let result = api.send(&AnalyticsRequest { range: requested }).await;
            // 期间切换过范围则丢弃
            if range.get_untracked() != requested {
                return;
            }
            match result {
                Ok(dashboard) => data.set(dashboard),
                Err(e) => notice.set(Notice::err(e.user_message("Failed to load analytics"))),
            }
            loading.set(false);
        });
    });

    let chart = Memo::new(move |_| data.with(|d| d.chart_data.clone()));
    let peak = Memo::new(move |_| chart.with(|c| c.iter().map(|p| p.clicks).max().unwrap_or(0)));

    view! {
        <AppShell title="Analytics">
            <Toast notice=notice />

            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Analytics"</h2>
                    <p class="text-base-content/70 text-sm">{move || range_label(range.get())}</p>
                </div>
                <div class="join">
                    {TimeRange::ALL
                        .into_iter()
                        .map(|r| {
                            view! {
                                <button
                                    class=move || {
                                        if range.get() == r {
                                            "join-item btn btn-sm btn-primary"
                                        } else {
                                            "join-item btn btn-sm"
                                        }
                                    }
                                    on:click=move |_| range.set(r)
                                >
                                    {r.as_str()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Clicks in range"</div>
                    <div class="stat-value text-primary">{move || data.with(|d| d.clicks_in_range())}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"All-time clicks"</div>
                    <div class="stat-value">{move || data.with(|d| d.total_clicks)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Average CTR"</div>
                    <div class="stat-value text-secondary">
                        {move || format!("{:.1}%", data.with(|d| d.avg_ctr))}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Daily clicks"</h3>
                    <Show
                        when=move || !chart.with(Vec::is_empty)
                        fallback=move || view! {
                            <p class="text-center py-8 text-base-content/50">
                                {move || if loading.get() { "Loading..." } else { "No clicks in this period." }}
                            </p>
                        }
                    >
                        <table class="table table-sm w-full">
                            <tbody>
                                <For
                                    each=move || chart.get()
                                    key=|p: &ChartPoint| (p.date.clone(), p.clicks)
                                    children=move |point| {
                                        let clicks = point.clicks;
                                        view! {
                                            <tr>
                                                <td class="w-28 font-mono text-xs">{point.date}</td>
                                                <td>
                                                    <progress
                                                        class="progress progress-primary w-full"
                                                        value=move || bar_width(clicks, peak.get())
                                                        max="100"
                                                    ></progress>
                                                </td>
                                                <td class="w-16 text-right">{point.clicks}</td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </Show>
                </div>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <TopList title="Top referrers" items=Signal::derive(move || data.with(|d| d.top_referrers.clone())) />
                <TopList title="Devices" items=Signal::derive(move || data.with(|d| d.top_devices.clone())) />
                <TopList title="Countries" items=Signal::derive(move || data.with(|d| d.top_countries.clone())) />
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Top links"</h3>
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Short link"</th>
                                <th class="hidden md:table-cell">"Destination"</th>
                                <th class="text-right">"Clicks"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || data.with(|d| d.top_links.clone())
                                key=|link| (link.id, link.clicks)
                                children=move |link| view! {
                                    <tr>
                                        <td class="font-mono text-sm font-bold">{link.short_code}</td>
                                        <td class="hidden md:table-cell max-w-xs truncate opacity-70">{link.original_url}</td>
                                        <td class="text-right">{link.clicks}</td>
                                    </tr>
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </AppShell>
    }
}

/// 排行榜卡片
#[component]
fn TopList(title: &'static str, items: Signal<Vec<NamedCount>>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title text-base">{title}</h3>
                <Show
                    when=move || !items.with(Vec::is_empty)
                    fallback=|| view! { <p class="text-sm text-base-content/50">"No data yet."</p> }
                >
                    <ul class="space-y-1">
                        <For
                            each=move || items.get()
                            key=|item| (item.name.clone(), item.value)
                            children=|item| view! {
                                <li class="flex justify-between text-sm">
                                    <span class="truncate">{item.name}</span>
                                    <span class="font-mono">{item.value}</span>
                                </li>
                            }
                        />
                    </ul>
                </Show>
            </div>
        </div>
    }
}

/// 相对峰值的百分比宽度
fn bar_width(clicks: i64, peak: i64) -> String {
    if peak <= 0 {
        return "0".to_string();
    }
    ((clicks.max(0) * 100) / peak).to_string()
}
