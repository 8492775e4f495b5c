use rust_decimal::Decimal;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::filters::{today, year_options, QueryParams, ARABIC_MONTHS};
use crate::pages::use_app;
use crate::reports::{report_rows, ReportKind, ReportRow};
use crate::ui::{
    alert, bind_select, card, field, format_currency, message_row, page_shell, select_options,
    use_currency_symbol, INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON, TD_CLASS, TH_CLASS,
};

pub fn report_query(year: &str, month: &str) -> QueryParams {
    QueryParams::new().with("year", year).with("month", month)
}

/// Calendar months as `1..=12`, led by an "all months" choice.
fn calendar_month_options() -> Vec<(String, String)> {
    std::iter::once((String::new(), "كل الأشهر".to_string()))
        .chain(
            ARABIC_MONTHS
                .iter()
                .enumerate()
                .map(|(i, name)| ((i + 1).to_string(), name.to_string())),
        )
        .collect()
}

#[function_component(ReportsPage)]
pub fn reports_page() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();

    let year = use_state(|| today().format("%Y").to_string());
    let month = use_state(String::new);
    let kind = use_state(|| ReportKind::default().value().to_string());
    let rows = use_state(|| None::<(ReportKind, Vec<ReportRow>)>);
    let generating = use_state(|| false);

    let on_generate = {
        let client: ApiClient = app.client.clone();
        let year = year.clone();
        let month = month.clone();
        let kind = kind.clone();
        let rows = rows.clone();
        let generating = generating.clone();
        Callback::from(move |_| {
            let client = client.clone();
            let rows = rows.clone();
            let generating = generating.clone();
            let report_kind = ReportKind::from_value(&kind);
            let query = report_query(&year, &month);
            generating.set(true);
            spawn_local(async move {
                match client.get::<Value>(report_kind.endpoint(), &query).await {
                    Ok(report) => {
                        let parsed = report_rows(report_kind, &report);
                        log::debug!("{} report: {} rows", report_kind.value(), parsed.len());
                        rows.set(Some((report_kind, parsed)));
                    }
                    Err(err) => {
                        log::error!("generating {} report failed: {}", report_kind.value(), err);
                        alert(&format!("حدث خطأ أثناء إنشاء التقرير: {}", err));
                    }
                }
                generating.set(false);
            });
        })
    };

    let on_print = Callback::from(|_| {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.print() {
                log::warn!("print failed: {:?}", err);
            }
        }
    });

    let years: Vec<(String, String)> = year_options(today())
        .into_iter()
        .map(|y| (y.to_string(), y.to_string()))
        .collect();
    let kinds: Vec<(String, String)> = ReportKind::ALL
        .iter()
        .map(|k| (k.value().to_string(), k.label().to_string()))
        .collect();

    let body = match &*rows {
        None => message_row(3, "اختر المعايير ثم اضغط على إنشاء التقرير"),
        Some((_, list)) if list.is_empty() => message_row(3, "لا توجد بيانات"),
        Some((_, list)) => html! {
            <>
                { for list.iter().map(|row| html! {
                    <tr class="text-sm hover:bg-muted/30 transition-colors">
                        <td class={TD_CLASS}>{ row.label.clone() }</td>
                        <td class={TD_CLASS}>{ format_currency(row.amount, &currency_symbol) }</td>
                        <td class={TD_CLASS}>{ format!("{}%", row.share.normalize()) }</td>
                    </tr>
                }) }
            </>
        },
    };
    let total: Decimal = match &*rows {
        Some((ReportKind::Expense | ReportKind::Financial | ReportKind::Teacher, list)) => {
            list.iter().map(|row| row.amount).sum()
        }
        Some((ReportKind::Income, list)) => list.first().map(|row| row.amount).unwrap_or_default(),
        None => Decimal::ZERO,
    };
    let title = match &*rows {
        Some((report_kind, _)) => report_kind.label(),
        None => "التقرير",
    };

    html! {
        { page_shell(
            "التقارير",
            html! {
                <button class={SECONDARY_BUTTON} onclick={on_print} disabled={rows.is_none()}>{"طباعة"}</button>
            },
            html! {
                <>
                    <div class="bg-card rounded-lg border border-border p-4 grid grid-cols-1 md:grid-cols-4 gap-3 items-end">
                        { field("السنة", html! {
                            <select class={INPUT_CLASS} onchange={bind_select(&year)}>
                                { select_options(&years, &year) }
                            </select>
                        }) }
                        { field("الشهر", html! {
                            <select class={INPUT_CLASS} onchange={bind_select(&month)}>
                                { select_options(&calendar_month_options(), &month) }
                            </select>
                        }) }
                        { field("نوع التقرير", html! {
                            <select class={INPUT_CLASS} onchange={bind_select(&kind)}>
                                { select_options(&kinds, &kind) }
                            </select>
                        }) }
                        <button class={PRIMARY_BUTTON} onclick={on_generate} disabled={*generating}>
                            { if *generating { "جاري الإنشاء..." } else { "إنشاء التقرير" } }
                        </button>
                    </div>
                    { card(title, html! {
                        <div class="overflow-x-auto">
                            <table class="w-full border-collapse">
                                <thead class="bg-secondary border-b border-border">
                                    <tr>
                                        <th class={TH_CLASS}>{"البند"}</th>
                                        <th class={TH_CLASS}>{"المبلغ"}</th>
                                        <th class={TH_CLASS}>{"النسبة"}</th>
                                    </tr>
                                </thead>
                                <tbody class="divide-y divide-border">
                                    { body }
                                </tbody>
                            </table>
                        </div>
                    }) }
                    if rows.is_some() {
                        <p class="text-sm font-bold text-foreground">
                            { format!("المجموع: {}", format_currency(total, &currency_symbol)) }
                        </p>
                    }
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_query_skips_an_unset_month() {
        let query = report_query("2024", "");
        assert_eq!(query.get("year"), Some("2024"));
        assert_eq!(query.get("month"), None);
        assert_eq!(report_query("2024", "3").get("month"), Some("3"));
    }

    #[test]
    fn calendar_months_are_numbered_from_one() {
        let options = calendar_month_options();
        assert_eq!(options.len(), 13);
        assert_eq!(options[1], ("1".to_string(), "يناير".to_string()));
        assert_eq!(options[12], ("12".to_string(), "ديسمبر".to_string()));
    }
}
