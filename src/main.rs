mod api;
mod bulk;
mod commissions;
mod filters;
mod models;
mod pages;
mod reports;
mod router;
mod selection;
mod session;
mod settings;
mod storage;
mod ui;

use yew::prelude::*;

use crate::pages::auth::LoginScreen;
use crate::pages::dashboard::{DashboardPage, SummaryBar};
use crate::pages::expenses::ExpensesPage;
use crate::pages::invoices::InvoicesPage;
use crate::pages::payments::PaymentsPage;
use crate::pages::reports::ReportsPage;
use crate::pages::settings::SettingsPage;
use crate::pages::teachers::TeachersPage;
use crate::pages::{AppContext, Tick};
use crate::router::{NavState, Section};
use crate::session::{Session, SessionStore};
use crate::settings::{load_settings, AccountingSettings};
use crate::storage::BrowserStorage;
use crate::ui::{
    icon_bar_chart, icon_credit_card, icon_file_text, icon_layout_grid, icon_log_out,
    icon_settings, icon_users, icon_wallet,
};

fn section_icon(section: Section) -> Html {
    match section {
        Section::Dashboard => icon_layout_grid(),
        Section::Payments => icon_wallet(),
        Section::Expenses => icon_credit_card(),
        Section::Teachers => icon_users(),
        Section::Invoices => icon_file_text(),
        Section::Reports => icon_bar_chart(),
        Section::Settings => icon_settings(),
    }
}

#[derive(Properties, PartialEq)]
struct LayoutProps {
    children: Children,
    session: Session,
    active: Section,
    summary_generation: u64,
    on_select: Callback<Section>,
    on_logout: Callback<()>,
}

#[function_component(Layout)]
fn layout(props: &LayoutProps) -> Html {
    html! {
        <div dir="rtl" class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active={props.active} on_select={props.on_select.clone()} on_logout={props.on_logout.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header session={props.session.clone()} summary_generation={props.summary_generation} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    session: Session,
    summary_generation: u64,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <SummaryBar key={props.summary_generation.to_string()} />
            <div class="flex items-center gap-3">
                <div class="text-left">
                    <p class="text-sm font-bold text-[#173E63]">{ props.session.display_name().to_string() }</p>
                    <p class="text-[10px] text-slate-500 font-bold">{ props.session.role_label().to_string() }</p>
                </div>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active: Section,
    on_select: Callback<Section>,
    on_logout: Callback<()>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_| on_logout.emit(()))
    };

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <span class="text-[#173E63] text-xl font-black tracking-tight">{"المحاسبة"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for Section::ALL.iter().map(|section| {
                        let class_name = if *section == props.active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let section = *section;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(section))}>
                                <span class="shrink-0">{ section_icon(section) }</span>
                                <span class="truncate whitespace-nowrap text-right">{ section.label() }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"تسجيل الخروج"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let session = use_state(|| SessionStore::new(BrowserStorage).restore());
    let nav = use_state(NavState::default);
    let settings = use_state(|| load_settings(&BrowserStorage));
    let summary_tick = use_reducer(Tick::default);

    let on_select = {
        let nav = nav.clone();
        Callback::from(move |section: Section| {
            let next = (*nav).navigate(section);
            log::debug!("showing {:?} (load #{})", next.active, next.generation);
            nav.set(next);
        })
    };

    let on_logout = {
        let session = session.clone();
        let nav = nav.clone();
        Callback::from(move |_| {
            SessionStore::new(BrowserStorage).clear();
            log::info!("signed out");
            nav.set(NavState::default());
            session.set(None);
        })
    };

    let refresh_summary = {
        let summary_tick = summary_tick.clone();
        Callback::from(move |_| summary_tick.dispatch(()))
    };

    let Some(current) = (*session).clone() else {
        let on_authenticated = {
            let session = session.clone();
            let nav = nav.clone();
            Callback::from(move |signed_in: Session| {
                nav.set(NavState::default());
                session.set(Some(signed_in));
            })
        };
        return html! { <LoginScreen on_authenticated={on_authenticated} /> };
    };

    let context = AppContext {
        client: current.client(),
        refresh_summary,
    };

    let key = nav.generation.to_string();
    let content = match nav.active {
        Section::Dashboard => html! { <DashboardPage key={key} /> },
        Section::Payments => html! { <PaymentsPage key={key} /> },
        Section::Expenses => html! { <ExpensesPage key={key} /> },
        Section::Teachers => html! { <TeachersPage key={key} /> },
        Section::Invoices => html! { <InvoicesPage key={key} /> },
        Section::Reports => html! { <ReportsPage key={key} /> },
        Section::Settings => html! { <SettingsPage key={key} /> },
    };

    html! {
        <ContextProvider<UseStateHandle<AccountingSettings>> context={settings}>
            <ContextProvider<AppContext> context={context}>
                <Layout
                    session={current}
                    active={nav.active}
                    summary_generation={summary_tick.0}
                    on_select={on_select}
                    on_logout={on_logout}
                >
                    { content }
                </Layout>
            </ContextProvider<AppContext>>
        </ContextProvider<UseStateHandle<AccountingSettings>>>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
