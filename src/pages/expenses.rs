use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{ApiClient, ApiError};
use crate::filters::{iso_date, today, QueryParams};
use crate::models::{payment_method_label, Expense, Listing};
use crate::pages::{payment_method_options, use_app, Tick};
use crate::ui::{
    alert, bind_input, bind_select, card, confirm, field, format_currency, icon_plus,
    message_row, page_shell, select_options, short_date, use_currency_symbol, ListBody, Modal,
    INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON, SMALL_BUTTON, SMALL_DANGER_BUTTON, TD_CLASS,
    TH_CLASS,
};

const NOT_SPECIFIED: &str = "غير محدد";

pub fn expense_kind_options(placeholder: Option<&str>) -> Vec<(String, String)> {
    let kinds = [("fixed", "ثابت"), ("variable", "متغير")]
        .into_iter()
        .map(|(value, label)| (value.to_string(), label.to_string()));
    placeholder
        .map(|label| (String::new(), label.to_string()))
        .into_iter()
        .chain(kinds)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilters {
    pub kind: String,
    pub category: String,
    pub start_date: String,
    pub end_date: String,
}

impl ExpenseFilters {
    pub fn query(&self) -> QueryParams {
        QueryParams::new()
            .with("type", &self.kind)
            .with("category", &self.category)
            .with("startDate", &self.start_date)
            .with("endDate", &self.end_date)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewExpense {
    description: String,
    amount: Decimal,
    category: String,
    #[serde(rename = "type")]
    kind: String,
    payment_method: String,
    date: String,
}

pub fn expense_details(expense: &Expense, currency_symbol: &str) -> String {
    format!(
        "تفاصيل المصروف:\nالوصف: {}\nالمبلغ: {}\nالتصنيف: {}\nالنوع: {}\nالتاريخ: {}",
        expense.description,
        format_currency(expense.amount, currency_symbol),
        expense.category,
        expense.kind,
        short_date(&expense.date)
    )
}

async fn fetch_expenses(client: &ApiClient, query: &QueryParams) -> Result<Vec<Expense>, ApiError> {
    let listing: Listing<Expense> = client.get("/accounting/expenses", query).await?;
    Ok(listing.into_parts().0)
}

#[function_component(ExpensesPage)]
pub fn expenses_page() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();

    let expenses = use_state(Vec::<Expense>::new);
    let loading = use_state(|| true);
    let reload = use_reducer(Tick::default);

    let kind_filter = use_state(String::new);
    let category_filter = use_state(String::new);
    let start_filter = use_state(String::new);
    let end_filter = use_state(String::new);

    let show_add = use_state(|| false);
    let form_description = use_state(String::new);
    let form_amount = use_state(String::new);
    let form_category = use_state(String::new);
    let form_kind = use_state(|| "variable".to_string());
    let form_method = use_state(|| "cash".to_string());
    let form_date = use_state(|| iso_date(today()));
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    {
        let expenses = expenses.clone();
        let loading = loading.clone();
        let filters = ExpenseFilters {
            kind: (*kind_filter).clone(),
            category: (*category_filter).clone(),
            start_date: (*start_filter).clone(),
            end_date: (*end_filter).clone(),
        };
        use_effect_with_deps(
            move |(client, _reload): &(ApiClient, u64)| {
                let client = client.clone();
                let query = filters.query();
                loading.set(true);
                spawn_local(async move {
                    match fetch_expenses(&client, &query).await {
                        Ok(list) => expenses.set(list),
                        Err(err) => log::error!("loading expenses failed: {}", err),
                    }
                    loading.set(false);
                });
                || ()
            },
            (app.client.clone(), reload.0),
        );
    }

    let on_apply = {
        let reload = reload.clone();
        Callback::from(move |_| reload.dispatch(()))
    };

    let on_clear = {
        let filters = [
            kind_filter.clone(),
            category_filter.clone(),
            start_filter.clone(),
            end_filter.clone(),
        ];
        let reload = reload.clone();
        Callback::from(move |_| {
            for filter in &filters {
                filter.set(String::new());
            }
            reload.dispatch(());
        })
    };

    let on_view = {
        let client = app.client.clone();
        let currency_symbol = currency_symbol.clone();
        Callback::from(move |id: String| {
            let client = client.clone();
            let currency_symbol = currency_symbol.clone();
            spawn_local(async move {
                match client
                    .get::<Expense>(&format!("/accounting/expenses/{}", id), &QueryParams::new())
                    .await
                {
                    Ok(expense) => alert(&expense_details(&expense, &currency_symbol)),
                    Err(err) => {
                        log::error!("loading expense {} failed: {}", id, err);
                        alert("حدث خطأ أثناء تحميل تفاصيل المصروف");
                    }
                }
            });
        })
    };

    let on_delete = {
        let client = app.client.clone();
        let refresh_summary = app.refresh_summary.clone();
        let reload = reload.clone();
        Callback::from(move |id: String| {
            if !confirm("هل تريد بالتأكيد حذف هذا المصروف؟") {
                return;
            }
            let client = client.clone();
            let refresh_summary = refresh_summary.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match client.delete(&format!("/accounting/expenses/{}", id)).await {
                    Ok(()) => {
                        alert("تم حذف المصروف بنجاح");
                        reload.dispatch(());
                        refresh_summary.emit(());
                    }
                    Err(err) => {
                        log::error!("deleting expense {} failed: {}", id, err);
                        alert(&err.alert_text("حدث خطأ أثناء حذف المصروف"));
                    }
                }
            });
        })
    };

    let on_toggle_add = {
        let show_add = show_add.clone();
        let form_date = form_date.clone();
        let form_error = form_error.clone();
        Callback::from(move |_| {
            form_date.set(iso_date(today()));
            form_error.set(None);
            show_add.set(!*show_add);
        })
    };

    let on_submit = {
        let client = app.client.clone();
        let refresh_summary = app.refresh_summary.clone();
        let show_add = show_add.clone();
        let reload = reload.clone();
        let form_description = form_description.clone();
        let form_amount = form_amount.clone();
        let form_category = form_category.clone();
        let form_kind = form_kind.clone();
        let form_method = form_method.clone();
        let form_date = form_date.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        Callback::from(move |_| {
            let amount = match form_amount.trim().parse::<Decimal>() {
                Ok(amount) if amount > Decimal::ZERO => amount,
                _ => {
                    form_error.set(Some("يرجى إدخال مبلغ صحيح".to_string()));
                    return;
                }
            };
            if form_description.trim().is_empty() {
                form_error.set(Some("يرجى إدخال وصف المصروف".to_string()));
                return;
            }
            let body = NewExpense {
                description: form_description.trim().to_string(),
                amount,
                category: form_category.trim().to_string(),
                kind: (*form_kind).clone(),
                payment_method: (*form_method).clone(),
                date: (*form_date).clone(),
            };

            form_error.set(None);
            saving.set(true);
            let client = client.clone();
            let refresh_summary = refresh_summary.clone();
            let show_add = show_add.clone();
            let reload = reload.clone();
            let form_description = form_description.clone();
            let form_amount = form_amount.clone();
            let form_error = form_error.clone();
            let saving = saving.clone();
            spawn_local(async move {
                match client
                    .post::<_, serde_json::Value>("/accounting/expenses", &body)
                    .await
                {
                    Ok(_) => {
                        alert("تم إضافة المصروف بنجاح");
                        form_description.set(String::new());
                        form_amount.set(String::new());
                        show_add.set(false);
                        reload.dispatch(());
                        refresh_summary.emit(());
                    }
                    Err(err) => {
                        log::error!("adding expense failed: {}", err);
                        form_error.set(Some(err.alert_text("حدث خطأ أثناء إضافة المصروف")));
                    }
                }
                saving.set(false);
            });
        })
    };

    let filter_bar = html! {
        <div class="bg-card rounded-lg border border-border p-4 grid grid-cols-1 md:grid-cols-5 gap-3 items-end">
            { field("النوع", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&kind_filter)}>
                    { select_options(&expense_kind_options(Some("الكل")), &kind_filter) }
                </select>
            }) }
            { field("التصنيف", html! {
                <input type="text" class={INPUT_CLASS} value={(*category_filter).clone()} oninput={bind_input(&category_filter)} />
            }) }
            { field("من تاريخ", html! {
                <input type="date" class={INPUT_CLASS} value={(*start_filter).clone()} oninput={bind_input(&start_filter)} />
            }) }
            { field("إلى تاريخ", html! {
                <input type="date" class={INPUT_CLASS} value={(*end_filter).clone()} oninput={bind_input(&end_filter)} />
            }) }
            <div class="flex gap-2">
                <button class={PRIMARY_BUTTON} onclick={on_apply}>{"تصفية"}</button>
                <button class={SECONDARY_BUTTON} onclick={on_clear}>{"مسح"}</button>
            </div>
        </div>
    };

    let add_modal = if *show_add {
        html! {
            <Modal title="إضافة مصروف" on_close={{
                let show_add = show_add.clone();
                Callback::from(move |_| show_add.set(false))
            }}>
                { field("الوصف", html! {
                    <input type="text" class={INPUT_CLASS} value={(*form_description).clone()} oninput={bind_input(&form_description)} />
                }) }
                { field(&format!("المبلغ ({})", currency_symbol), html! {
                    <input type="number" class={INPUT_CLASS} value={(*form_amount).clone()} oninput={bind_input(&form_amount)} />
                }) }
                { field("التصنيف", html! {
                    <input type="text" class={INPUT_CLASS} value={(*form_category).clone()} oninput={bind_input(&form_category)} />
                }) }
                { field("النوع", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_kind)}>
                        { select_options(&expense_kind_options(None), &form_kind) }
                    </select>
                }) }
                { field("طريقة الدفع", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_method)}>
                        { select_options(&payment_method_options(None), &form_method) }
                    </select>
                }) }
                { field("التاريخ", html! {
                    <input type="date" class={INPUT_CLASS} value={(*form_date).clone()} oninput={bind_input(&form_date)} />
                }) }
                if let Some(msg) = &*form_error {
                    <p class="text-sm text-red-500">{ msg.clone() }</p>
                }
                <button class={PRIMARY_BUTTON} onclick={on_submit} disabled={*saving}>
                    { if *saving { "جاري الحفظ..." } else { "حفظ" } }
                </button>
            </Modal>
        }
    } else {
        html! {}
    };

    let total: Decimal = expenses.iter().map(|e| e.amount).sum();

    let table = html! {
        <div class="overflow-x-auto">
            <table class="w-full border-collapse">
                <thead class="bg-secondary border-b border-border">
                    <tr>
                        <th class={TH_CLASS}>{"التاريخ"}</th>
                        <th class={TH_CLASS}>{"الوصف"}</th>
                        <th class={TH_CLASS}>{"التصنيف"}</th>
                        <th class={TH_CLASS}>{"المستلم"}</th>
                        <th class={TH_CLASS}>{"المبلغ"}</th>
                        <th class={TH_CLASS}>{"طريقة الدفع"}</th>
                        <th class={TH_CLASS}>{"إجراءات"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { match ListBody::choose(*loading, expenses.len()) {
                        ListBody::Loading => message_row(7, "جاري التحميل..."),
                        ListBody::Empty => message_row(7, "لا توجد مصروفات"),
                        ListBody::Rows => html! {
                            <>
                                { for expenses.iter().map(|expense| {
                                    let view = {
                                        let on_view = on_view.clone();
                                        let id = expense.id.clone();
                                        Callback::from(move |_| on_view.emit(id.clone()))
                                    };
                                    let delete = {
                                        let on_delete = on_delete.clone();
                                        let id = expense.id.clone();
                                        Callback::from(move |_| on_delete.emit(id.clone()))
                                    };
                                    let recipient = expense
                                        .recipient
                                        .as_ref()
                                        .and_then(|r| r.name())
                                        .unwrap_or(NOT_SPECIFIED)
                                        .to_string();
                                    html! {
                                        <tr key={expense.id.clone()} class="text-sm hover:bg-muted/30 transition-colors">
                                            <td class={TD_CLASS}>{ short_date(&expense.date) }</td>
                                            <td class={TD_CLASS}>{ expense.description.clone() }</td>
                                            <td class={TD_CLASS}>{ expense.category.clone() }</td>
                                            <td class={TD_CLASS}>{ recipient }</td>
                                            <td class={classes!(TD_CLASS, "font-semibold", "text-red-600")}>
                                                { format_currency(expense.amount, &currency_symbol) }
                                            </td>
                                            <td class={TD_CLASS}>{ payment_method_label(&expense.payment_method).to_string() }</td>
                                            <td class={classes!(TD_CLASS, "space-x-2")}>
                                                <button class={SMALL_BUTTON} onclick={view}>{"عرض"}</button>
                                                <button class={SMALL_DANGER_BUTTON} onclick={delete}>{"حذف"}</button>
                                            </td>
                                        </tr>
                                    }
                                }) }
                            </>
                        }
                    }}
                </tbody>
            </table>
        </div>
    };

    html! {
        { page_shell(
            "المصروفات",
            html! {
                <button onclick={on_toggle_add} class={PRIMARY_BUTTON}>
                    { icon_plus() }
                    { "إضافة مصروف" }
                </button>
            },
            html! {
                <>
                    { filter_bar }
                    { card("قائمة المصروفات", table) }
                    if !expenses.is_empty() {
                        <p class="text-sm font-bold text-foreground">
                            { format!("المجموع: {}", format_currency(total, &currency_symbol)) }
                        </p>
                    }
                    { add_modal }
                </>
            }
        ) }
    }
}
