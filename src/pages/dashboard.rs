use rust_decimal::Decimal;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{ApiClient, ApiError};
use crate::filters::QueryParams;
use crate::models::{Expense, Listing, Payment, Status, Transaction};
use crate::pages::use_app;
use crate::ui::{
    card, format_currency, message_row, page_shell, short_date, status_badge,
    use_currency_symbol, StatCard, StatIcon, TD_CLASS, TH_CLASS,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub pending_count: usize,
}

impl DashboardStats {
    pub fn from_records(paid: &[Payment], expenses: &[Expense], pending_count: usize) -> Self {
        let income: Decimal = paid.iter().map(|p| p.amount).sum();
        let expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
        Self {
            income,
            expenses,
            net: income - expenses,
            pending_count,
        }
    }
}

async fn fetch_list<T: serde::de::DeserializeOwned>(
    client: &ApiClient,
    path: &str,
    status: &str,
) -> Vec<T> {
    let query = QueryParams::new().with("status", status);
    match client.get::<Listing<T>>(path, &query).await {
        Ok(listing) => listing.into_parts().0,
        Err(err) => {
            log::error!("loading {}?status={} failed: {}", path, status, err);
            Vec::new()
        }
    }
}

/// A failing endpoint contributes zero rather than hiding the others.
pub async fn fetch_stats(client: &ApiClient) -> DashboardStats {
    let paid: Vec<Payment> = fetch_list(client, "/payments", "paid").await;
    let expenses: Vec<Expense> = fetch_list(client, "/accounting/expenses", "paid").await;
    let pending: Vec<Payment> = fetch_list(client, "/payments", "pending").await;
    DashboardStats::from_records(&paid, &expenses, pending.len())
}

async fn fetch_recent(client: &ApiClient) -> Result<Vec<Transaction>, ApiError> {
    let query = QueryParams::new().with("limit", "10");
    let listing: Listing<Transaction> = client.get("/accounting/all-transactions", &query).await?;
    Ok(listing.into_parts().0)
}

/// Compact figures in the header; remounted whenever a page reports that
/// money moved.
#[function_component(SummaryBar)]
pub fn summary_bar() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();
    let stats = use_state(|| None::<DashboardStats>);

    {
        let stats = stats.clone();
        use_effect_with_deps(
            move |client: &ApiClient| {
                let client = client.clone();
                spawn_local(async move {
                    stats.set(Some(fetch_stats(&client).await));
                });
                || ()
            },
            app.client,
        );
    }

    match *stats {
        None => html! { <span class="text-xs text-muted-foreground">{"..."}</span> },
        Some(stats) => html! {
            <div class="flex items-center gap-4 text-xs font-bold text-[#173E63]">
                <span>{ format!("صافي الربح: {}", format_currency(stats.net, &currency_symbol)) }</span>
                <span>{ format!("مدفوعات معلقة: {}", stats.pending_count) }</span>
            </div>
        },
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();
    let stats = use_state(DashboardStats::default);
    let transactions = use_state(Vec::<Transaction>::new);
    let loading = use_state(|| true);

    {
        let stats = stats.clone();
        let transactions = transactions.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |client: &ApiClient| {
                let client = client.clone();
                spawn_local(async move {
                    stats.set(fetch_stats(&client).await);
                    match fetch_recent(&client).await {
                        Ok(list) => transactions.set(list),
                        Err(err) => log::error!("loading recent transactions failed: {}", err),
                    }
                    loading.set(false);
                });
                || ()
            },
            app.client,
        );
    }

    html! {
        { page_shell(
            "لوحة التحكم",
            html! {},
            html! {
                <>
                    <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
                        <StatCard title="إجمالي الإيرادات" value={format_currency(stats.income, &currency_symbol)} icon={StatIcon::UpRight} />
                        <StatCard title="إجمالي المصروفات" value={format_currency(stats.expenses, &currency_symbol)} icon={StatIcon::CreditCard} />
                        <StatCard title="صافي الربح" value={format_currency(stats.net, &currency_symbol)} icon={StatIcon::Wallet} />
                        <StatCard title="المدفوعات المعلقة" value={stats.pending_count.to_string()} icon={StatIcon::Clock} />
                    </div>

                    { card("المعاملات الحديثة", html! {
                        <div class="overflow-x-auto">
                            <table class="w-full border-collapse">
                                <thead class="bg-secondary border-b border-border">
                                    <tr>
                                        <th class={TH_CLASS}>{"التاريخ"}</th>
                                        <th class={TH_CLASS}>{"النوع"}</th>
                                        <th class={TH_CLASS}>{"الوصف"}</th>
                                        <th class={TH_CLASS}>{"المبلغ"}</th>
                                        <th class={TH_CLASS}>{"الحالة"}</th>
                                    </tr>
                                </thead>
                                <tbody class="divide-y divide-border">
                                    { if *loading {
                                        message_row(5, "جاري التحميل...")
                                    } else if transactions.is_empty() {
                                        message_row(5, "لا توجد معاملات")
                                    } else {
                                        html! {
                                            <>
                                                { for transactions.iter().map(|tx| {
                                                    let (kind, sign, tone) = if tx.is_income() {
                                                        ("إيراد", "+", "text-emerald-600")
                                                    } else {
                                                        ("مصروف", "-", "text-red-600")
                                                    };
                                                    html! {
                                                        <tr class="text-sm hover:bg-muted/30 transition-colors">
                                                            <td class={TD_CLASS}>{ short_date(&tx.date) }</td>
                                                            <td class={TD_CLASS}>{ kind }</td>
                                                            <td class={TD_CLASS}>{ tx.description.clone() }</td>
                                                            <td class={classes!(TD_CLASS, "font-semibold", tone)}>
                                                                { format!("{} {}", sign, format_currency(tx.amount, &currency_symbol)) }
                                                            </td>
                                                            <td class={TD_CLASS}>{ status_badge(tx.status.unwrap_or(Status::Other)) }</td>
                                                        </tr>
                                                    }
                                                }) }
                                            </>
                                        }
                                    }}
                                </tbody>
                            </table>
                        </div>
                    }) }
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_sum_paid_income_against_expenses() {
        let paid: Vec<Payment> = serde_json::from_value(serde_json::json!([
            { "_id": "p1", "amount": 1500, "status": "paid" },
            { "_id": "p2", "amount": 2500, "status": "paid" }
        ]))
        .unwrap();
        let expenses: Vec<Expense> = serde_json::from_value(serde_json::json!([
            { "_id": "e1", "amount": 4500, "description": "كراء" }
        ]))
        .unwrap();

        let stats = DashboardStats::from_records(&paid, &expenses, 3);
        assert_eq!(stats.income, Decimal::from(4000));
        assert_eq!(stats.expenses, Decimal::from(4500));
        assert_eq!(stats.net, Decimal::from(-500));
        assert_eq!(stats.pending_count, 3);
    }

    #[test]
    fn no_records_means_zero_everywhere() {
        assert_eq!(DashboardStats::from_records(&[], &[], 0), DashboardStats::default());
    }
}
