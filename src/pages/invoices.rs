use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::{ApiClient, ApiError};
use crate::filters::{iso_date, today, QueryParams};
use crate::models::{linked_name, Invoice, InvoiceItem, Listing, Status};
use crate::pages::{lookup_options, use_app, use_lookup, Tick};
use crate::settings::AccountingSettings;
use crate::ui::{
    alert, bind_input, bind_select, card, field, format_currency, icon_plus, message_row,
    page_shell, select_options, short_date, status_badge, use_currency_symbol, ListBody, Modal,
    INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON, SMALL_BUTTON, SMALL_DANGER_BUTTON, TD_CLASS,
    TH_CLASS,
};

const DEFAULT_NOTE: &str = "شكراً لتعاملكم معنا";
const TOO_LARGE: &str = "المبالغ المدخلة كبيرة جداً";

pub fn invoice_kind_options(placeholder: Option<&str>) -> Vec<(String, String)> {
    let kinds = [("student", "طالب"), ("teacher", "أستاذ"), ("other", "أخرى")]
        .into_iter()
        .map(|(value, label)| (value.to_string(), label.to_string()));
    placeholder
        .map(|label| (String::new(), label.to_string()))
        .into_iter()
        .chain(kinds)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceFilters {
    pub kind: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl InvoiceFilters {
    pub fn query(&self) -> QueryParams {
        QueryParams::new()
            .with("type", &self.kind)
            .with("status", &self.status)
            .with("startDate", &self.start_date)
            .with("endDate", &self.end_date)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn line_total(item: &InvoiceItem) -> Option<Decimal> {
    item.quantity.checked_mul(item.amount)
}

impl InvoiceTotals {
    /// `tax_rate` is a percentage. `None` when the amounts are too large to
    /// add up.
    pub fn of(items: &[InvoiceItem], tax_rate: Decimal) -> Option<Self> {
        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(line_total(item)?))?;
        let tax = subtotal
            .checked_mul(tax_rate)?
            .checked_div(Decimal::ONE_HUNDRED)?
            .round_dp(2);
        Some(Self {
            subtotal,
            tax,
            total: subtotal.checked_add(tax)?,
        })
    }
}

/// One editable line of the create form, kept as typed.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDraft {
    pub description: String,
    pub quantity: String,
    pub amount: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: "1".to_string(),
            amount: String::new(),
        }
    }
}

impl ItemDraft {
    /// Blank lines are skipped; a line with a description needs a positive
    /// quantity and a non-negative amount.
    pub fn parse(&self) -> Result<Option<InvoiceItem>, String> {
        let description = self.description.trim();
        if description.is_empty() && self.amount.trim().is_empty() {
            return Ok(None);
        }
        if description.is_empty() {
            return Err("يرجى إدخال وصف لكل بند".to_string());
        }
        let quantity = self
            .quantity
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|q| *q > Decimal::ZERO)
            .ok_or_else(|| format!("كمية غير صحيحة للبند: {}", description))?;
        let amount = self
            .amount
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|a| *a >= Decimal::ZERO)
            .ok_or_else(|| format!("مبلغ غير صحيح للبند: {}", description))?;
        Ok(Some(InvoiceItem {
            description: description.to_string(),
            quantity,
            amount,
        }))
    }
}

pub fn parse_items(drafts: &[ItemDraft]) -> Result<Vec<InvoiceItem>, String> {
    let mut items = Vec::new();
    for draft in drafts {
        if let Some(item) = draft.parse()? {
            items.push(item);
        }
    }
    if items.is_empty() {
        return Err("يرجى إضافة بند واحد على الأقل".to_string());
    }
    Ok(items)
}

/// Due date from the configured payment terms, in days. A date past the
/// calendar's end leaves the issue date.
pub fn due_date(issued: NaiveDate, settings: &AccountingSettings) -> NaiveDate {
    Duration::try_days(settings.payment_terms_days())
        .and_then(|terms| issued.checked_add_signed(terms))
        .unwrap_or(issued)
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewInvoice {
    #[serde(rename = "type")]
    kind: String,
    recipient: String,
    items: Vec<InvoiceItem>,
    tax_rate: Decimal,
    total_amount: Decimal,
    date: String,
    due_date: String,
}

async fn fetch_invoices(client: &ApiClient, query: &QueryParams) -> Result<Vec<Invoice>, ApiError> {
    let listing: Listing<Invoice> = client.get("/accounting/invoices", query).await?;
    Ok(listing.into_parts().0)
}

fn invoice_view(invoice: &Invoice, currency_symbol: &str) -> Html {
    let money = |amount: Option<Decimal>| {
        amount
            .map(|amount| format_currency(amount, currency_symbol))
            .unwrap_or_else(|| "---".to_string())
    };
    let totals = InvoiceTotals::of(&invoice.items, invoice.tax_rate);
    html! {
        <div class="space-y-4 text-sm">
            <div class="grid grid-cols-2 gap-2">
                <p>{ format!("رقم الفاتورة: {}", invoice.invoice_number) }</p>
                <p>{ format!("النوع: {}", invoice.kind) }</p>
                <p>{ format!("التاريخ: {}", short_date(&invoice.date)) }</p>
                <p>{ format!("تاريخ الاستحقاق: {}", short_date(invoice.due_date.as_deref().unwrap_or_default())) }</p>
                <p>{ format!("المستلم: {}", linked_name(&invoice.recipient)) }</p>
                <p>{ status_badge(invoice.status) }</p>
            </div>
            <table class="w-full border-collapse">
                <thead class="bg-secondary border-b border-border">
                    <tr>
                        <th class={TH_CLASS}>{"البند"}</th>
                        <th class={TH_CLASS}>{"الكمية"}</th>
                        <th class={TH_CLASS}>{"السعر"}</th>
                        <th class={TH_CLASS}>{"المجموع"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { for invoice.items.iter().map(|item| html! {
                        <tr>
                            <td class={TD_CLASS}>{ item.description.clone() }</td>
                            <td class={TD_CLASS}>{ item.quantity.normalize().to_string() }</td>
                            <td class={TD_CLASS}>{ format_currency(item.amount, currency_symbol) }</td>
                            <td class={TD_CLASS}>{ money(line_total(item)) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
            <div class="space-y-1 font-bold">
                <p>{ format!("المجموع الفرعي: {}", money(totals.map(|t| t.subtotal))) }</p>
                <p>{ format!("الضريبة: {}", money(totals.map(|t| t.tax))) }</p>
                <p>{ format!("الإجمالي: {}", money(totals.map(|t| t.total))) }</p>
            </div>
            <p class="text-muted-foreground">{ invoice.notes.clone().unwrap_or_else(|| DEFAULT_NOTE.to_string()) }</p>
        </div>
    }
}

#[function_component(InvoicesPage)]
pub fn invoices_page() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();
    let settings = use_context::<UseStateHandle<AccountingSettings>>()
        .map(|handle| (*handle).clone())
        .unwrap_or_default();
    let students = use_lookup("/students");
    let teachers = use_lookup("/teachers");

    let invoices = use_state(Vec::<Invoice>::new);
    let loading = use_state(|| true);
    let reload = use_reducer(Tick::default);
    let viewing = use_state(|| None::<Invoice>);

    let kind_filter = use_state(String::new);
    let status_filter = use_state(String::new);
    let start_filter = use_state(String::new);
    let end_filter = use_state(String::new);

    let show_create = use_state(|| false);
    let form_kind = use_state(|| "student".to_string());
    let form_recipient = use_state(String::new);
    let form_date = use_state(|| iso_date(today()));
    let drafts = use_state(|| vec![ItemDraft::default()]);
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    {
        let invoices = invoices.clone();
        let loading = loading.clone();
        let filters = InvoiceFilters {
            kind: (*kind_filter).clone(),
            status: (*status_filter).clone(),
            start_date: (*start_filter).clone(),
            end_date: (*end_filter).clone(),
        };
        use_effect_with_deps(
            move |(client, _reload): &(ApiClient, u64)| {
                let client = client.clone();
                let query = filters.query();
                loading.set(true);
                spawn_local(async move {
                    match fetch_invoices(&client, &query).await {
                        Ok(list) => invoices.set(list),
                        Err(err) => log::error!("loading invoices failed: {}", err),
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
            status_filter.clone(),
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
        let viewing = viewing.clone();
        Callback::from(move |id: String| {
            let client = client.clone();
            let viewing = viewing.clone();
            spawn_local(async move {
                match client
                    .get::<Invoice>(&format!("/accounting/invoices/{}", id), &QueryParams::new())
                    .await
                {
                    Ok(invoice) => viewing.set(Some(invoice)),
                    Err(err) => {
                        log::error!("loading invoice {} failed: {}", id, err);
                        alert("حدث خطأ أثناء تحميل الفاتورة");
                    }
                }
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

    let on_toggle_create = {
        let show_create = show_create.clone();
        let drafts = drafts.clone();
        let form_error = form_error.clone();
        let form_date = form_date.clone();
        Callback::from(move |_| {
            drafts.set(vec![ItemDraft::default()]);
            form_error.set(None);
            form_date.set(iso_date(today()));
            show_create.set(!*show_create);
        })
    };

    let on_add_line = {
        let drafts = drafts.clone();
        Callback::from(move |_| {
            let mut next = (*drafts).clone();
            next.push(ItemDraft::default());
            drafts.set(next);
        })
    };

    let edit_line = {
        let drafts = drafts.clone();
        move |index: usize, apply: fn(&mut ItemDraft, String)| {
            let drafts = drafts.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                let mut next = (*drafts).clone();
                if let Some(line) = next.get_mut(index) {
                    apply(line, input.value());
                }
                drafts.set(next);
            })
        }
    };

    let on_submit = {
        let client = app.client.clone();
        let show_create = show_create.clone();
        let reload = reload.clone();
        let form_kind = form_kind.clone();
        let form_recipient = form_recipient.clone();
        let form_date = form_date.clone();
        let drafts = drafts.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let settings = settings.clone();
        Callback::from(move |_| {
            let items = match parse_items(&drafts) {
                Ok(items) => items,
                Err(msg) => {
                    form_error.set(Some(msg));
                    return;
                }
            };
            if form_recipient.is_empty() {
                form_error.set(Some("يرجى اختيار المستلم".to_string()));
                return;
            }
            let issued = NaiveDate::parse_from_str(&form_date, "%Y-%m-%d").unwrap_or_else(|_| today());
            let tax_rate = settings.tax_rate_percent();
            let Some(totals) = InvoiceTotals::of(&items, tax_rate) else {
                form_error.set(Some(TOO_LARGE.to_string()));
                return;
            };
            let body = NewInvoice {
                kind: (*form_kind).clone(),
                recipient: (*form_recipient).clone(),
                total_amount: totals.total,
                items,
                tax_rate,
                date: iso_date(issued),
                due_date: iso_date(due_date(issued, &settings)),
            };

            form_error.set(None);
            saving.set(true);
            let client = client.clone();
            let show_create = show_create.clone();
            let reload = reload.clone();
            let form_error = form_error.clone();
            let saving = saving.clone();
            spawn_local(async move {
                match client
                    .post::<_, serde_json::Value>("/accounting/invoices", &body)
                    .await
                {
                    Ok(_) => {
                        alert("تم إنشاء الفاتورة بنجاح");
                        show_create.set(false);
                        reload.dispatch(());
                    }
                    Err(err) => {
                        log::error!("creating invoice failed: {}", err);
                        form_error.set(Some(err.alert_text("حدث خطأ أثناء إنشاء الفاتورة")));
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
                    { select_options(&invoice_kind_options(Some("الكل")), &kind_filter) }
                </select>
            }) }
            { field("الحالة", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&status_filter)}>
                    { select_options(&[
                        (String::new(), "الكل".to_string()),
                        ("pending".to_string(), Status::Pending.label().to_string()),
                        ("paid".to_string(), Status::Paid.label().to_string()),
                        ("overdue".to_string(), Status::Overdue.label().to_string()),
                    ], &status_filter) }
                </select>
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

    let view_modal = match &*viewing {
        None => html! {},
        Some(invoice) => html! {
            <Modal title={format!("فاتورة {}", invoice.invoice_number)} on_close={{
                let viewing = viewing.clone();
                Callback::from(move |_| viewing.set(None))
            }}>
                { invoice_view(invoice, &currency_symbol) }
                <button class={SECONDARY_BUTTON} onclick={on_print.clone()}>{"طباعة"}</button>
            </Modal>
        },
    };

    let recipients = if *form_kind == "teacher" {
        lookup_options(&teachers, "اختر الأستاذ")
    } else {
        lookup_options(&students, "اختر الطالب")
    };
    let preview_total = match parse_items(&drafts) {
        Ok(items) => InvoiceTotals::of(&items, settings.tax_rate_percent())
            .map(|totals| format_currency(totals.total, &currency_symbol))
            .unwrap_or_else(|| TOO_LARGE.to_string()),
        Err(_) => format_currency(Decimal::ZERO, &currency_symbol),
    };

    let create_modal = if *show_create {
        html! {
            <Modal title="إنشاء فاتورة" on_close={{
                let show_create = show_create.clone();
                Callback::from(move |_| show_create.set(false))
            }}>
                { field("النوع", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_kind)}>
                        { select_options(&invoice_kind_options(None), &form_kind) }
                    </select>
                }) }
                { field("المستلم", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_recipient)}>
                        { select_options(&recipients, &form_recipient) }
                    </select>
                }) }
                { field("التاريخ", html! {
                    <input type="date" class={INPUT_CLASS} value={(*form_date).clone()} oninput={bind_input(&form_date)} />
                }) }
                <div class="space-y-2">
                    { for drafts.iter().enumerate().map(|(index, line)| {
                        let remove = {
                            let drafts = drafts.clone();
                            Callback::from(move |_| {
                                let mut next = (*drafts).clone();
                                if next.len() > 1 {
                                    next.remove(index);
                                }
                                drafts.set(next);
                            })
                        };
                        html! {
                            <div class="grid grid-cols-7 gap-2 items-center">
                                <input type="text" class={classes!(INPUT_CLASS, "col-span-3")} placeholder="الوصف" value={line.description.clone()}
                                    oninput={edit_line(index, |line, value| line.description = value)} />
                                <input type="number" class={INPUT_CLASS} placeholder="الكمية" value={line.quantity.clone()}
                                    oninput={edit_line(index, |line, value| line.quantity = value)} />
                                <input type="number" class={classes!(INPUT_CLASS, "col-span-2")} placeholder="السعر" value={line.amount.clone()}
                                    oninput={edit_line(index, |line, value| line.amount = value)} />
                                <button class={SMALL_DANGER_BUTTON} onclick={remove}>{"×"}</button>
                            </div>
                        }
                    }) }
                    <button class={SMALL_BUTTON} onclick={on_add_line}>{"إضافة بند"}</button>
                </div>
                <p class="text-sm font-bold">{ format!("الإجمالي: {}", preview_total) }</p>
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

    let table = html! {
        <div class="overflow-x-auto">
            <table class="w-full border-collapse">
                <thead class="bg-secondary border-b border-border">
                    <tr>
                        <th class={TH_CLASS}>{"رقم الفاتورة"}</th>
                        <th class={TH_CLASS}>{"النوع"}</th>
                        <th class={TH_CLASS}>{"المستلم"}</th>
                        <th class={TH_CLASS}>{"التاريخ"}</th>
                        <th class={TH_CLASS}>{"المبلغ"}</th>
                        <th class={TH_CLASS}>{"الحالة"}</th>
                        <th class={TH_CLASS}>{"إجراءات"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { match ListBody::choose(*loading, invoices.len()) {
                        ListBody::Loading => message_row(7, "جاري التحميل..."),
                        ListBody::Empty => message_row(7, "لا توجد فواتير"),
                        ListBody::Rows => html! {
                            <>
                                { for invoices.iter().map(|invoice| {
                                    let view = {
                                        let on_view = on_view.clone();
                                        let id = invoice.id.clone();
                                        Callback::from(move |_| on_view.emit(id.clone()))
                                    };
                                    html! {
                                        <tr key={invoice.id.clone()} class="text-sm hover:bg-muted/30 transition-colors">
                                            <td class={TD_CLASS}>{ invoice.invoice_number.clone() }</td>
                                            <td class={TD_CLASS}>{ invoice.kind.clone() }</td>
                                            <td class={TD_CLASS}>{ linked_name(&invoice.recipient) }</td>
                                            <td class={TD_CLASS}>{ short_date(&invoice.date) }</td>
                                            <td class={TD_CLASS}>{ format_currency(invoice.total_amount, &currency_symbol) }</td>
                                            <td class={TD_CLASS}>{ status_badge(invoice.status) }</td>
                                            <td class={TD_CLASS}>
                                                <button class={SMALL_BUTTON} onclick={view}>{"عرض"}</button>
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
            "الفواتير",
            html! {
                <button onclick={on_toggle_create} class={PRIMARY_BUTTON}>
                    { icon_plus() }
                    { "إنشاء فاتورة" }
                </button>
            },
            html! {
                <>
                    { filter_bar }
                    { card("قائمة الفواتير", table) }
                    { view_modal }
                    { create_modal }
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, quantity: i64, amount: i64) -> InvoiceItem {
        InvoiceItem {
            description: description.to_string(),
            quantity: Decimal::from(quantity),
            amount: Decimal::from(amount),
        }
    }

    #[test]
    fn totals_multiply_quantity_and_add_tax() {
        let items = vec![item("رسوم التسجيل", 1, 5000), item("كتب", 3, 1200)];
        let totals = InvoiceTotals::of(&items, Decimal::from(10)).unwrap();
        assert_eq!(totals.subtotal, Decimal::from(8600));
        assert_eq!(totals.tax, Decimal::from(860));
        assert_eq!(totals.total, Decimal::from(9460));
    }

    #[test]
    fn zero_tax_leaves_subtotal() {
        let totals = InvoiceTotals::of(&[item("x", 2, 250)], Decimal::ZERO).unwrap();
        assert_eq!(totals.total, Decimal::from(500));
        assert_eq!(
            InvoiceTotals::of(&[], Decimal::from(19)),
            Some(InvoiceTotals::default())
        );
    }

    #[test]
    fn drafts_skip_blank_lines_and_reject_bad_numbers() {
        let drafts = vec![
            ItemDraft {
                description: "رسوم".to_string(),
                quantity: "2".to_string(),
                amount: "1500".to_string(),
            },
            ItemDraft::default(),
        ];
        let items = parse_items(&drafts).unwrap();
        assert_eq!(items, vec![item("رسوم", 2, 1500)]);

        let bad = vec![ItemDraft {
            description: "رسوم".to_string(),
            quantity: "0".to_string(),
            amount: "10".to_string(),
        }];
        assert!(parse_items(&bad).is_err());
        assert!(parse_items(&[ItemDraft::default()]).is_err());
    }

    #[test]
    fn due_date_follows_payment_terms() {
        let issued = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let settings = AccountingSettings::default();
        assert_eq!(due_date(issued, &settings), NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());

        let custom = AccountingSettings {
            payment_terms: "7".to_string(),
            ..AccountingSettings::default()
        };
        assert_eq!(due_date(issued, &custom), NaiveDate::from_ymd_opt(2024, 1, 22).unwrap());
    }

    #[test]
    fn huge_payment_terms_fall_back_to_thirty_days() {
        let issued = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let huge = AccountingSettings {
            payment_terms: "100000000".to_string(),
            ..AccountingSettings::default()
        };
        assert_eq!(due_date(issued, &huge), NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(due_date(NaiveDate::MAX, &AccountingSettings::default()), NaiveDate::MAX);
    }

    #[test]
    fn overflowing_amounts_give_no_totals() {
        let draft = ItemDraft {
            description: "رسوم".to_string(),
            quantity: "79228162514264337593543950335".to_string(),
            amount: "2".to_string(),
        };
        let items = parse_items(&[draft]).unwrap();
        assert_eq!(line_total(&items[0]), None);
        assert_eq!(InvoiceTotals::of(&items, Decimal::ZERO), None);

        let near_max = vec![InvoiceItem {
            description: "x".to_string(),
            quantity: Decimal::ONE,
            amount: Decimal::MAX,
        }];
        assert_eq!(InvoiceTotals::of(&near_max, Decimal::from(50)), None);
        assert!(InvoiceTotals::of(&near_max, Decimal::ZERO).is_some());
    }

    #[test]
    fn invoice_filters_map_to_query_keys() {
        let filters = InvoiceFilters {
            status: "overdue".to_string(),
            start_date: "2024-01-01".to_string(),
            ..InvoiceFilters::default()
        };
        let query = filters.query();
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(pairs, vec![("status", "overdue"), ("startDate", "2024-01-01")]);
    }
}
