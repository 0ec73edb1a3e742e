//! 静态页面：隐私政策、服务条款、常见问题、404

use crate::components::layout::PublicNavbar;
use crate::web::router::Link;
use leptos::prelude::*;

#[component]
fn StaticPage(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <PublicNavbar />
            <div class="max-w-3xl mx-auto p-6 md:p-10">
                <article class="prose bg-base-100 rounded-box shadow p-8 max-w-none">
                    <h1>{title}</h1>
                    {children()}
                </article>
            </div>
        </div>
    }
}

#[component]
pub fn PrivacyPage() -> impl IntoView {
    view! {
        <StaticPage title="Privacy Policy">
            <p>"Shawty stores the links you create together with your account details."</p>
            <h2>"What we collect"</h2>
            <ul>
                <li>"Your email address, name and optional bio."</li>
                <li>"The destination URLs, aliases and settings of your links."</li>
                <li>"Aggregated click data: date, referrer, device type and country."</li>
            </ul>
            <h2>"What we do not collect"</h2>
            <p>"We do not sell personal data or track visitors across other sites."</p>
            <h2>"Deleting your data"</h2>
            <p>"Deleting your account from Settings removes your profile, links and analytics."</p>
        </StaticPage>
    }
}

#[component]
pub fn TermsPage() -> impl IntoView {
    view! {
        <StaticPage title="Terms of Service">
            <p>"By using Shawty you agree not to shorten links to malware, phishing or illegal content."</p>
            <p>"Links that break these rules may be disabled or removed without notice."</p>
            <p>"The service is provided as is, without any guarantee of availability."</p>
        </StaticPage>
    }
}

#[component]
pub fn FaqPage() -> impl IntoView {
    view! {
        <StaticPage title="Frequently Asked Questions">
            <h2>"Do I need an account?"</h2>
            <p>"No. Anyone can shorten a link from the home page. An account lets you edit links and see analytics."</p>
            <h2>"Can I choose my own short code?"</h2>
            <p>"Yes. Custom aliases may use letters, digits, dashes and underscores."</p>
            <h2>"How do protected links work?"</h2>
            <p>"Visitors are asked for the password before being redirected."</p>
            <h2>"Can a link expire?"</h2>
            <p>"Set an expiry date or a maximum number of clicks when creating the link."</p>
        </StaticPage>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md">
                    <h1 class="text-7xl font-bold text-primary">"404"</h1>
                    <p class="py-6 text-base-content/70">"The page you are looking for does not exist."</p>
                    <Link to="/" class="btn btn-primary">"Back home"</Link>
                </div>
            </div>
        </div>
    }
}
