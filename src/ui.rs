use rust_decimal::Decimal;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::models::Status;
use crate::settings::AccountingSettings;

pub const INPUT_CLASS: &str = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";
pub const PRIMARY_BUTTON: &str = "flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all disabled:opacity-50";
pub const SECONDARY_BUTTON: &str = "flex items-center gap-2 bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all";
pub const SMALL_BUTTON: &str = "px-3 py-1 rounded-lg text-xs font-bold bg-secondary text-secondary-foreground hover:opacity-90";
pub const SMALL_SUCCESS_BUTTON: &str = "px-3 py-1 rounded-lg text-xs font-bold bg-emerald-600 text-white hover:opacity-90";
pub const SMALL_DANGER_BUTTON: &str = "px-3 py-1 rounded-lg text-xs font-bold bg-red-600 text-white hover:opacity-90";
pub const TH_CLASS: &str = "px-6 py-3 text-right text-sm font-semibold text-secondary-foreground";
pub const TD_CLASS: &str = "px-6 py-3 text-foreground";

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[hook]
pub fn use_currency_symbol() -> String {
    use_context::<UseStateHandle<AccountingSettings>>()
        .map(|settings| settings.currency_symbol().to_string())
        .unwrap_or_else(|| "د.ج".to_string())
}

pub fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_textarea(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let input: HtmlSelectElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                <div class="flex items-center gap-2">{ actions }</div>
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

pub fn card(title: &str, children: Html) -> Html {
    html! {
        <div class="bg-card rounded-lg border border-border overflow-hidden">
            <div class="px-6 py-4 border-b border-border">
                <h3 class="text-lg font-bold text-foreground">{ title.to_string() }</h3>
            </div>
            { children }
        </div>
    }
}

/// What the body of a list table shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    Empty,
    Rows,
}

impl ListBody {
    /// Rows already on screen stay while a reload is in flight. An empty
    /// result gets a single no-records row.
    pub fn choose(loading: bool, rows: usize) -> Self {
        match (rows, loading) {
            (0, true) => ListBody::Loading,
            (0, false) => ListBody::Empty,
            _ => ListBody::Rows,
        }
    }
}

/// The single row shown in place of an empty result set.
pub fn message_row(colspan: usize, message: &str) -> Html {
    html! {
        <tr>
            <td colspan={colspan.to_string()} class="px-6 py-6 text-center text-muted-foreground">{ message.to_string() }</td>
        </tr>
    }
}

pub fn status_badge(status: Status) -> Html {
    if status == Status::Other {
        return html! {};
    }
    html! {
        <span class={classes!("px-3", "py-1", "rounded-full", "text-[10px]", "font-bold", status.badge_class())}>
            { status.label() }
        </span>
    }
}

pub fn field(label: &str, control: Html) -> Html {
    html! {
        <div class="space-y-1">
            <label class="block text-sm font-medium text-foreground">{ label.to_string() }</label>
            { control }
        </div>
    }
}

pub fn select_options(options: &[(String, String)], selected: &str) -> Html {
    html! {
        <>
            { for options.iter().map(|(value, label)| html! {
                <option value={value.clone()} selected={value == selected}>{ label.clone() }</option>
            }) }
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: String,
    pub on_close: Callback<()>,
    pub children: Children,
}

#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40">
            <div class="w-full max-w-lg bg-card border border-border rounded-2xl shadow-lg">
                <div class="flex items-center justify-between px-6 py-4 border-b border-border">
                    <h3 class="text-lg font-bold text-foreground">{ props.title.clone() }</h3>
                    <button onclick={on_close} class="text-muted-foreground text-xl" aria-label="إغلاق">{"×"}</button>
                </div>
                <div class="p-6 space-y-4">
                    { for props.children.iter() }
                </div>
            </div>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    UpRight,
    CreditCard,
    Wallet,
    Clock,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub value: String,
    pub icon: StatIcon,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ props.value.clone() }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::UpRight => icon_arrow_up_right(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Wallet => icon_wallet(),
                        StatIcon::Clock => icon_clock(),
                    }
                }
            </div>
        </div>
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1,250.5 د.ج`: thousands separators, at most two decimals, trailing zeros
/// dropped.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(2).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };
    let mut formatted = format!("{}{}", sign, group_thousands(whole));
    if let Some(fraction) = fraction {
        formatted.push('.');
        formatted.push_str(fraction);
    }
    format!("{} {}", formatted, symbol)
}

/// Server dates are ISO timestamps; tables show just the day.
pub fn short_date(raw: &str) -> String {
    if raw.is_empty() {
        return "---".to_string();
    }
    match raw.get(..10) {
        Some(day) if chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok() => day.to_string(),
        _ => raw.to_string(),
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="text-foreground">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
pub fn icon_users() -> Html {
    icon_base("M17 21v-2a4 4 0 00-4-4H5a4 4 0 00-4 4v2M9 7a4 4 0 100 8 4 4 0 000-8z")
}
pub fn icon_file_text() -> Html {
    icon_base("M14 2H6a2 2 0 00-2 2v16a2 2 0 002 2h12a2 2 0 002-2V8zM14 2v6h6M16 13H8M16 17H8")
}
pub fn icon_bar_chart() -> Html {
    icon_base("M4 20V10M10 20V4M16 20v-6M22 20H2")
}
pub fn icon_settings() -> Html {
    icon_base("M12 1v3M12 20v3M4.2 4.2l2.1 2.1M17.7 17.7l2.1 2.1M1 12h3M20 12h3M4.2 19.8l2.1-2.1M17.7 6.3l2.1-2.1")
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_arrow_up_right() -> Html {
    icon_base("M7 17L17 7M7 7h10v10")
}
pub fn icon_clock() -> Html {
    icon_base("M12 2a10 10 0 100 20 10 10 0 000-20zM12 6v6l4 2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(Decimal::from(1500), "د.ج"), "1,500 د.ج");
        assert_eq!(format_currency(Decimal::from(1234567), "$"), "1,234,567 $");
        assert_eq!(format_currency(Decimal::from(999), "$"), "999 $");
    }

    #[test]
    fn currency_keeps_significant_decimals_only() {
        assert_eq!(format_currency(Decimal::new(125050, 2), "د.ج"), "1,250.5 د.ج");
        assert_eq!(format_currency(Decimal::new(1000, 2), "د.ج"), "10 د.ج");
        assert_eq!(format_currency(Decimal::new(12346, 3), "€"), "12.35 €");
    }

    #[test]
    fn negative_amounts_carry_a_sign() {
        assert_eq!(format_currency(Decimal::from(-25000), "د.ج"), "-25,000 د.ج");
        assert_eq!(format_currency(Decimal::ZERO, "د.ج"), "0 د.ج");
    }

    #[test]
    fn empty_results_get_a_single_message_row() {
        assert_eq!(ListBody::choose(false, 0), ListBody::Empty);
        assert_eq!(ListBody::choose(true, 0), ListBody::Loading);
        assert_eq!(ListBody::choose(true, 3), ListBody::Rows);
        assert_eq!(ListBody::choose(false, 1), ListBody::Rows);
    }

    #[test]
    fn short_date_trims_timestamps() {
        assert_eq!(short_date("2024-03-05T10:00:00.000Z"), "2024-03-05");
        assert_eq!(short_date("2024-03-05"), "2024-03-05");
        assert_eq!(short_date(""), "---");
        assert_eq!(short_date("yesterday"), "yesterday");
    }
}
