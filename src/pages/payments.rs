use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api::{ApiClient, ApiError};
use crate::bulk::dispatch_all;
use crate::filters::{iso_date, month_options, today, Pager, PagerAction, QueryParams};
use crate::models::{linked_name, payment_method_label, Listing, Payment, Status};
use crate::pages::{lookup_options, payment_method_options, use_app, use_lookup, Tick};
use crate::selection::PaymentSelection;
use crate::ui::{
    alert, bind_input, bind_select, card, confirm, field, format_currency, icon_plus,
    message_row, page_shell, select_options, short_date, status_badge, use_currency_symbol,
    ListBody, Modal, INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON, SMALL_BUTTON, SMALL_SUCCESS_BUTTON,
    TD_CLASS, TH_CLASS,
};

pub const PAYMENTS_PER_PAGE: u32 = 20;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentFilters {
    pub status: String,
    pub month: String,
    pub method: String,
    pub class: String,
    pub student: String,
}

impl PaymentFilters {
    pub fn query(&self, pager: &Pager) -> QueryParams {
        QueryParams::new()
            .with_page(pager)
            .with("status", &self.status)
            .with("month", &self.month)
            .with("paymentMethod", &self.method)
            .with("class", &self.class)
            .with("student", &self.student)
    }
}

/// Body of `PUT /payments/:id/pay`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlePayment {
    pub payment_date: String,
    pub payment_method: String,
}

impl SettlePayment {
    pub fn cash_today() -> Self {
        Self {
            payment_date: iso_date(today()),
            payment_method: "cash".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewPayment {
    student: String,
    class: String,
    month: String,
    amount: Decimal,
    payment_method: String,
    payment_date: String,
}

pub fn payment_details(payment: &Payment, currency_symbol: &str) -> String {
    format!(
        "تفاصيل الدفعة:\nالطالب: {}\nالحصة: {}\nالمبلغ: {}\nالشهر: {}\nالحالة: {}",
        linked_name(&payment.student),
        linked_name(&payment.class),
        format_currency(payment.amount, currency_symbol),
        payment.month,
        payment.status.label()
    )
}

async fn fetch_payments(
    client: &ApiClient,
    query: &QueryParams,
) -> Result<(Vec<Payment>, Option<u32>), ApiError> {
    let listing: Listing<Payment> = client.get("/payments", query).await?;
    Ok(listing.into_parts())
}

/// Any 2xx settles the payment, whatever the body holds.
pub async fn settle_payment(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .put_text(&format!("/payments/{}/pay", id), &SettlePayment::cash_today())
        .await
        .map(|_| ())
}

#[function_component(PaymentsPage)]
pub fn payments_page() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();
    let classes = use_lookup("/classes");
    let students = use_lookup("/students");

    let payments = use_state(Vec::<Payment>::new);
    let loading = use_state(|| true);
    let pager = use_reducer(|| Pager::new(PAYMENTS_PER_PAGE));
    let reload = use_reducer(Tick::default);
    let selection = use_state(PaymentSelection::default);

    let status_filter = use_state(String::new);
    let month_filter = use_state(String::new);
    let method_filter = use_state(String::new);
    let class_filter = use_state(String::new);
    let student_filter = use_state(String::new);

    let show_add = use_state(|| false);
    let form_student = use_state(String::new);
    let form_class = use_state(String::new);
    let form_month = use_state(String::new);
    let form_amount = use_state(String::new);
    let form_method = use_state(|| "cash".to_string());
    let form_date = use_state(|| iso_date(today()));
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let months = month_options(today());

    {
        let payments = payments.clone();
        let loading = loading.clone();
        let page = pager.page;
        let pager = pager.clone();
        let filters = PaymentFilters {
            status: (*status_filter).clone(),
            month: (*month_filter).clone(),
            method: (*method_filter).clone(),
            class: (*class_filter).clone(),
            student: (*student_filter).clone(),
        };
        use_effect_with_deps(
            move |(client, _page, _reload): &(ApiClient, u32, u64)| {
                let client = client.clone();
                let query = filters.query(&pager);
                loading.set(true);
                spawn_local(async move {
                    match fetch_payments(&client, &query).await {
                        Ok((list, total_pages)) => {
                            payments.set(list);
                            pager.dispatch(PagerAction::TotalPages(total_pages));
                        }
                        Err(err) => log::error!("loading payments failed: {}", err),
                    }
                    loading.set(false);
                });
                || ()
            },
            (app.client.clone(), page, reload.0),
        );
    }

    let on_apply = {
        let pager = pager.clone();
        let reload = reload.clone();
        Callback::from(move |_| {
            pager.dispatch(PagerAction::First);
            reload.dispatch(());
        })
    };

    let on_clear = {
        let filters = [
            status_filter.clone(),
            month_filter.clone(),
            method_filter.clone(),
            class_filter.clone(),
            student_filter.clone(),
        ];
        let pager = pager.clone();
        let reload = reload.clone();
        Callback::from(move |_| {
            for filter in &filters {
                filter.set(String::new());
            }
            pager.dispatch(PagerAction::First);
            reload.dispatch(());
        })
    };

    let on_prev = {
        let pager = pager.clone();
        Callback::from(move |_| pager.dispatch(PagerAction::Prev))
    };

    let on_next = {
        let pager = pager.clone();
        Callback::from(move |_| pager.dispatch(PagerAction::Next))
    };

    let row_ids: Vec<String> = payments.iter().map(|p| p.id.clone()).collect();
    let all_selected = selection.covers(row_ids.iter().map(String::as_str));

    let on_select_all = {
        let selection = selection.clone();
        let row_ids = row_ids.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let next = (*selection)
                .clone()
                .set_all(row_ids.iter().map(String::as_str), input.checked());
            selection.set(next);
        })
    };

    let on_pay_selected = {
        let client = app.client.clone();
        let refresh_summary = app.refresh_summary.clone();
        let selection = selection.clone();
        let reload = reload.clone();
        Callback::from(move |_| {
            if selection.is_empty() {
                alert("يرجى تحديد مدفوعات لتسديدها");
                return;
            }
            if !confirm(&format!(
                "هل تريد بالتأكيد تسديد {} مدفوعات؟",
                selection.len()
            )) {
                return;
            }
            let client = client.clone();
            let refresh_summary = refresh_summary.clone();
            let selection = selection.clone();
            let reload = reload.clone();
            let ids = selection.ids();
            spawn_local(async move {
                dispatch_all(
                    ids,
                    |id| {
                        let client = client.clone();
                        async move { settle_payment(&client, &id).await }
                    },
                    |outcome| {
                        alert(&outcome.payments_summary());
                        selection.set(PaymentSelection::default());
                        reload.dispatch(());
                        refresh_summary.emit(());
                    },
                )
                .await;
            });
        })
    };

    let on_mark_paid = {
        let client = app.client.clone();
        let refresh_summary = app.refresh_summary.clone();
        let reload = reload.clone();
        Callback::from(move |id: String| {
            let client = client.clone();
            let refresh_summary = refresh_summary.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match settle_payment(&client, &id).await {
                    Ok(()) => {
                        alert("تم تسديد الدفعة بنجاح");
                        reload.dispatch(());
                        refresh_summary.emit(());
                    }
                    Err(err) => {
                        log::error!("settling payment {} failed: {}", id, err);
                        alert(&err.alert_text("حدث خطأ أثناء تسديد الدفعة"));
                    }
                }
            });
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
                    .get::<Payment>(&format!("/payments/{}", id), &QueryParams::new())
                    .await
                {
                    Ok(payment) => alert(&payment_details(&payment, &currency_symbol)),
                    Err(err) => {
                        log::error!("loading payment {} failed: {}", id, err);
                        alert("حدث خطأ أثناء تحميل تفاصيل الدفعة");
                    }
                }
            });
        })
    };

    let on_toggle_add = {
        let show_add = show_add.clone();
        let form_error = form_error.clone();
        Callback::from(move |_| {
            show_add.set(!*show_add);
            form_error.set(None);
        })
    };

    let on_submit = {
        let client = app.client.clone();
        let show_add = show_add.clone();
        let reload = reload.clone();
        let form_student = form_student.clone();
        let form_class = form_class.clone();
        let form_month = form_month.clone();
        let form_amount = form_amount.clone();
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
            if form_student.is_empty() || form_class.is_empty() || form_month.is_empty() {
                form_error.set(Some("يرجى اختيار الطالب والحصة والشهر".to_string()));
                return;
            }
            let body = NewPayment {
                student: (*form_student).clone(),
                class: (*form_class).clone(),
                month: (*form_month).clone(),
                amount,
                payment_method: (*form_method).clone(),
                payment_date: (*form_date).clone(),
            };

            form_error.set(None);
            saving.set(true);
            let client = client.clone();
            let show_add = show_add.clone();
            let reload = reload.clone();
            let form_amount = form_amount.clone();
            let form_error = form_error.clone();
            let saving = saving.clone();
            spawn_local(async move {
                match client.post::<_, serde_json::Value>("/payments", &body).await {
                    Ok(_) => {
                        alert("تم إضافة الدفعة بنجاح");
                        form_amount.set(String::new());
                        show_add.set(false);
                        reload.dispatch(());
                    }
                    Err(err) => {
                        log::error!("adding payment failed: {}", err);
                        form_error.set(Some(err.alert_text("حدث خطأ أثناء إضافة الدفعة")));
                    }
                }
                saving.set(false);
            });
        })
    };

    let filter_bar = html! {
        <div class="bg-card rounded-lg border border-border p-4 grid grid-cols-1 md:grid-cols-6 gap-3 items-end">
            { field("الحالة", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&status_filter)}>
                    { select_options(&[
                        (String::new(), "الكل".to_string()),
                        ("pending".to_string(), Status::Pending.label().to_string()),
                        ("paid".to_string(), Status::Paid.label().to_string()),
                        ("late".to_string(), Status::Late.label().to_string()),
                    ], &status_filter) }
                </select>
            }) }
            { field("الشهر", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&month_filter)}>
                    <option value="" selected={month_filter.is_empty()}>{"كل الأشهر"}</option>
                    { select_options(&months, &month_filter) }
                </select>
            }) }
            { field("طريقة الدفع", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&method_filter)}>
                    { select_options(&payment_method_options(Some("الكل")), &method_filter) }
                </select>
            }) }
            { field("الحصة", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&class_filter)}>
                    { select_options(&lookup_options(&classes, "كل الحصص"), &class_filter) }
                </select>
            }) }
            { field("الطالب", html! {
                <input type="text" class={INPUT_CLASS} placeholder="بحث عن طالب" value={(*student_filter).clone()} oninput={bind_input(&student_filter)} />
            }) }
            <div class="flex gap-2">
                <button class={PRIMARY_BUTTON} onclick={on_apply}>{"تصفية"}</button>
                <button class={SECONDARY_BUTTON} onclick={on_clear}>{"مسح"}</button>
            </div>
        </div>
    };

    let add_modal = if *show_add {
        html! {
            <Modal title="إضافة دفعة" on_close={{
                let show_add = show_add.clone();
                Callback::from(move |_| show_add.set(false))
            }}>
                { field("الطالب", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_student)}>
                        { select_options(&lookup_options(&students, "اختر الطالب"), &form_student) }
                    </select>
                }) }
                { field("الحصة", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_class)}>
                        { select_options(&lookup_options(&classes, "اختر الحصة"), &form_class) }
                    </select>
                }) }
                { field("الشهر", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_month)}>
                        <option value="" selected={form_month.is_empty()}>{"اختر الشهر"}</option>
                        { select_options(&months, &form_month) }
                    </select>
                }) }
                { field(&format!("المبلغ ({})", currency_symbol), html! {
                    <input type="number" class={INPUT_CLASS} value={(*form_amount).clone()} oninput={bind_input(&form_amount)} />
                }) }
                { field("طريقة الدفع", html! {
                    <select class={INPUT_CLASS} onchange={bind_select(&form_method)}>
                        { select_options(&payment_method_options(None), &form_method) }
                    </select>
                }) }
                { field("تاريخ الدفع", html! {
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

    let table = html! {
        <div class="overflow-x-auto">
            <table class="w-full border-collapse">
                <thead class="bg-secondary border-b border-border">
                    <tr>
                        <th class={TH_CLASS}>
                            <input type="checkbox" checked={all_selected} onchange={on_select_all} />
                        </th>
                        <th class={TH_CLASS}>{"الطالب"}</th>
                        <th class={TH_CLASS}>{"الحصة"}</th>
                        <th class={TH_CLASS}>{"الشهر"}</th>
                        <th class={TH_CLASS}>{"المبلغ"}</th>
                        <th class={TH_CLASS}>{"طريقة الدفع"}</th>
                        <th class={TH_CLASS}>{"الحالة"}</th>
                        <th class={TH_CLASS}>{"تاريخ الدفع"}</th>
                        <th class={TH_CLASS}>{"إجراءات"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { match ListBody::choose(*loading, payments.len()) {
                        ListBody::Loading => message_row(9, "جاري التحميل..."),
                        ListBody::Empty => message_row(9, "لا توجد مدفوعات"),
                        ListBody::Rows => html! {
                            <>
                                { for payments.iter().map(|payment| {
                                    let id = payment.id.clone();
                                    let on_check = {
                                        let selection = selection.clone();
                                        let id = id.clone();
                                        Callback::from(move |e: Event| {
                                            let input: HtmlInputElement = e.target_unchecked_into();
                                            selection.set((*selection).clone().toggle(&id, input.checked()));
                                        })
                                    };
                                    let view = {
                                        let on_view = on_view.clone();
                                        let id = id.clone();
                                        Callback::from(move |_| on_view.emit(id.clone()))
                                    };
                                    let pay = {
                                        let on_mark_paid = on_mark_paid.clone();
                                        let id = id.clone();
                                        Callback::from(move |_| on_mark_paid.emit(id.clone()))
                                    };
                                    html! {
                                        <tr key={id.clone()} class="text-sm hover:bg-muted/30 transition-colors">
                                            <td class={TD_CLASS}>
                                                <input type="checkbox" checked={selection.contains(&id)} onchange={on_check} />
                                            </td>
                                            <td class={TD_CLASS}>{ linked_name(&payment.student) }</td>
                                            <td class={TD_CLASS}>{ linked_name(&payment.class) }</td>
                                            <td class={TD_CLASS}>{ payment.month.clone() }</td>
                                            <td class={TD_CLASS}>{ format_currency(payment.amount, &currency_symbol) }</td>
                                            <td class={TD_CLASS}>{ payment_method_label(&payment.payment_method).to_string() }</td>
                                            <td class={TD_CLASS}>{ status_badge(payment.status) }</td>
                                            <td class={TD_CLASS}>{ short_date(payment.payment_date.as_deref().unwrap_or_default()) }</td>
                                            <td class={classes!(TD_CLASS, "space-x-2")}>
                                                <button class={SMALL_BUTTON} onclick={view}>{"عرض"}</button>
                                                if payment.status != Status::Paid {
                                                    <button class={SMALL_SUCCESS_BUTTON} onclick={pay}>{"تسديد"}</button>
                                                }
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
            "المدفوعات",
            html! {
                <button onclick={on_toggle_add} class={PRIMARY_BUTTON}>
                    { icon_plus() }
                    { "إضافة دفعة" }
                </button>
            },
            html! {
                <>
                    { filter_bar }
                    { card("قائمة المدفوعات", table) }
                    if !payments.is_empty() {
                        <div class="flex items-center justify-between">
                            <div class="flex items-center gap-3">
                                <span class="text-sm text-muted-foreground">{ selection.count_label() }</span>
                                <button class={PRIMARY_BUTTON} onclick={on_pay_selected}>{"تسديد المحدد"}</button>
                            </div>
                            <div class="flex items-center gap-3">
                                <button class={SECONDARY_BUTTON} onclick={on_prev}>{"السابق"}</button>
                                <span class="text-sm text-muted-foreground">{ pager.label() }</span>
                                <button class={SECONDARY_BUTTON} onclick={on_next}>{"التالي"}</button>
                            </div>
                        </div>
                    }
                    { add_modal }
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_build_the_payments_query() {
        let filters = PaymentFilters {
            status: "pending".to_string(),
            class: "c1".to_string(),
            ..PaymentFilters::default()
        };
        let query = filters.query(&Pager::new(PAYMENTS_PER_PAGE));
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(
            pairs,
            vec![("page", "1"), ("limit", "20"), ("status", "pending"), ("class", "c1")]
        );
    }

    #[test]
    fn settle_body_is_cash_dated_today() {
        let body = serde_json::to_value(SettlePayment::cash_today()).unwrap();
        assert_eq!(body["paymentMethod"], "cash");
        assert_eq!(body["paymentDate"], iso_date(today()));
    }

    #[test]
    fn details_text_lists_the_payment() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "student": { "_id": "s1", "name": "ليلى" },
            "class": { "_id": "c1", "name": "فيزياء" },
            "month": "2024-02",
            "amount": 2000,
            "status": "pending"
        }))
        .unwrap();
        let text = payment_details(&payment, "د.ج");
        assert!(text.contains("الطالب: ليلى"));
        assert!(text.contains("الحصة: فيزياء"));
        assert!(text.contains("المبلغ: 2,000 د.ج"));
        assert!(text.contains("الحالة: معلق"));
    }
}
