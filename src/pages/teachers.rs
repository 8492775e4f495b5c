use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{reply_message, ApiClient, ApiError};
use crate::bulk::dispatch_all;
use crate::commissions::{
    class_commission_amount, group_commissions, ClassCommissionPayment, ClassDetails,
    CommissionGroup, CommissionPayment, CommissionStatement, CommissionTotals, GroupKey,
    SalaryPayment, DEFAULT_CLASS_PERCENTAGE,
};
use crate::filters::{iso_date, month_options, today, Pager, PagerAction, QueryParams};
use crate::models::{linked_id, linked_name, Linked, Listing, Status, TeacherCommission};
use crate::pages::{lookup_options, payment_method_options, use_app, use_lookup, Tick};
use crate::ui::{
    alert, bind_input, bind_select, confirm, field, format_currency, page_shell,
    select_options, short_date, status_badge, use_currency_symbol, ListBody, Modal, INPUT_CLASS,
    PRIMARY_BUTTON, SECONDARY_BUTTON, SMALL_BUTTON, SMALL_SUCCESS_BUTTON, TD_CLASS, TH_CLASS,
};

pub const COMMISSIONS_PER_PAGE: u32 = 10;

const COMMISSIONS_PATH: &str = "/accounting/teacher-commissions";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommissionFilters {
    pub teacher: String,
    pub month: String,
    pub status: String,
    pub class: String,
}

impl CommissionFilters {
    pub fn query(&self, pager: &Pager) -> QueryParams {
        QueryParams::new()
            .with_page(pager)
            .with("teacher", &self.teacher)
            .with("month", &self.month)
            .with("status", &self.status)
            .with("class", &self.class)
    }
}

/// The paid records behind a teacher's month, for the printed statement.
pub fn month_paid_query(teacher_id: &str, month: &str) -> QueryParams {
    QueryParams::new()
        .with("teacher", teacher_id)
        .with("month", month)
        .with("status", "paid")
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SalaryRun {
    payment_method: String,
    payment_date: String,
}

/// State of the class payment dialog, fixed when it opens.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassPayTarget {
    pub teacher: Option<Linked>,
    pub class: Option<Linked>,
    pub month: String,
    pub collected: Decimal,
}

impl ClassPayTarget {
    /// `None` unless the group is keyed by teacher and class and a month is
    /// known, either from its records or from the month filter.
    pub fn for_group(group: &CommissionGroup, month_filter: &str) -> Option<Self> {
        if group.key != GroupKey::ByTeacherClass {
            return None;
        }
        let month = group
            .common_month()
            .map(str::to_string)
            .or_else(|| (!month_filter.is_empty()).then(|| month_filter.to_string()))?;
        Some(Self {
            teacher: group.teacher.clone(),
            class: group.class.clone(),
            month,
            collected: group.totals.pending,
        })
    }

    pub fn payment(
        &self,
        payment_method: &str,
        payment_date: &str,
        percentage: Decimal,
    ) -> ClassCommissionPayment {
        ClassCommissionPayment {
            teacher_id: linked_id(&self.teacher).to_string(),
            class_id: linked_id(&self.class).to_string(),
            month: self.month.clone(),
            payment_method: payment_method.to_string(),
            payment_date: payment_date.to_string(),
            percentage,
        }
    }
}

pub fn parse_percentage(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE_HUNDRED)
}

#[derive(Clone, Debug, PartialEq)]
enum PayDialog {
    Single(TeacherCommission),
    Class(ClassPayTarget),
}

pub async fn pay_single(client: &ApiClient, commission_id: &str) -> Result<String, ApiError> {
    let body = CommissionPayment {
        commission_id: commission_id.to_string(),
        payment_method: "cash".to_string(),
        payment_date: iso_date(today()),
    };
    let reply = client
        .post_text(&format!("{}/pay-single", COMMISSIONS_PATH), &body)
        .await?;
    Ok(reply_message(&reply).unwrap_or_else(|| "تم دفع العمولة بنجاح".to_string()))
}

/// What is left to show once a teacher's month has been paid.
enum MonthPaid {
    Statement(CommissionStatement),
    NothingToPrint,
    Unlisted(ApiError),
}

/// Settles a teacher's month, then lists what got paid so it can be printed.
/// A failure of the second call leaves the payment standing.
async fn pay_teacher_month(
    client: &ApiClient,
    teacher_id: &str,
    month: &str,
) -> Result<MonthPaid, ApiError> {
    let body = SalaryPayment {
        month: month.to_string(),
        payment_method: "cash".to_string(),
        payment_date: iso_date(today()),
    };
    client
        .post_text(&format!("/teachers/{}/pay-salary", teacher_id), &body)
        .await?;
    let outcome = match fetch_commissions(client, &month_paid_query(teacher_id, month)).await {
        Ok((records, _)) => {
            let stamp = chrono::Utc::now().timestamp_millis();
            match CommissionStatement::from_paid(teacher_id, month, &records, stamp) {
                Some(statement) => MonthPaid::Statement(statement),
                None => MonthPaid::NothingToPrint,
            }
        }
        Err(err) => MonthPaid::Unlisted(err),
    };
    Ok(outcome)
}

async fn fetch_commissions(
    client: &ApiClient,
    query: &QueryParams,
) -> Result<(Vec<TeacherCommission>, Option<u32>), ApiError> {
    let listing: Listing<TeacherCommission> = client.get(COMMISSIONS_PATH, query).await?;
    Ok(listing.into_parts())
}

fn totals_badges(totals: &CommissionTotals, currency_symbol: &str) -> Html {
    html! {
        <div class="flex flex-wrap gap-2 text-xs font-bold">
            <span class="px-3 py-1 rounded-full bg-amber-100 text-amber-700">
                { format!("معلق: {}", format_currency(totals.pending, currency_symbol)) }
            </span>
            <span class="px-3 py-1 rounded-full bg-emerald-100 text-emerald-700">
                { format!("مدفوع: {}", format_currency(totals.paid, currency_symbol)) }
            </span>
            <span class="px-3 py-1 rounded-full bg-secondary text-secondary-foreground">
                { format!("المجموع: {}", format_currency(totals.total, currency_symbol)) }
            </span>
        </div>
    }
}

fn statement_view(statement: &CommissionStatement, currency_symbol: &str) -> Html {
    html! {
        <div class="space-y-4 text-sm">
            <div class="grid grid-cols-2 gap-2">
                <p>{ format!("رقم الفاتورة: {}", statement.number) }</p>
                <p>{ format!("الأستاذ: {}", statement.teacher) }</p>
                <p class="col-span-2 font-bold">{ statement.title() }</p>
            </div>
            <table class="w-full border-collapse">
                <thead class="bg-secondary border-b border-border">
                    <tr>
                        <th class={TH_CLASS}>{"البند"}</th>
                        <th class={TH_CLASS}>{"المبلغ"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    { for statement.lines.iter().map(|line| html! {
                        <tr>
                            <td class={TD_CLASS}>{ line.description.clone() }</td>
                            <td class={TD_CLASS}>{ format_currency(line.amount, currency_symbol) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
            <p class="font-bold">{ format!("الإجمالي: {}", format_currency(statement.total, currency_symbol)) }</p>
        </div>
    }
}

#[function_component(TeachersPage)]
pub fn teachers_page() -> Html {
    let app = use_app();
    let currency_symbol = use_currency_symbol();
    let teachers = use_lookup("/teachers");
    let classes = use_lookup("/classes");

    let commissions = use_state(Vec::<TeacherCommission>::new);
    let loading = use_state(|| true);
    let pager = use_reducer(|| Pager::new(COMMISSIONS_PER_PAGE));
    let reload = use_reducer(Tick::default);
    let group_key = use_state(GroupKey::default);

    let teacher_filter = use_state(String::new);
    let month_filter = use_state(String::new);
    let status_filter = use_state(String::new);
    let class_filter = use_state(String::new);

    let dialog = use_state(|| None::<PayDialog>);
    let form_method = use_state(|| "cash".to_string());
    let form_date = use_state(|| iso_date(today()));
    let form_percentage = use_state(|| DEFAULT_CLASS_PERCENTAGE.to_string());
    let busy = use_state(|| false);
    let statement = use_state(|| None::<CommissionStatement>);

    let months = month_options(today());

    {
        let commissions = commissions.clone();
        let loading = loading.clone();
        let page = pager.page;
        let pager = pager.clone();
        let filters = CommissionFilters {
            teacher: (*teacher_filter).clone(),
            month: (*month_filter).clone(),
            status: (*status_filter).clone(),
            class: (*class_filter).clone(),
        };
        use_effect_with_deps(
            move |(client, _page, _reload): &(ApiClient, u32, u64)| {
                let client = client.clone();
                let query = filters.query(&pager);
                loading.set(true);
                spawn_local(async move {
                    match fetch_commissions(&client, &query).await {
                        Ok((list, total_pages)) => {
                            commissions.set(list);
                            pager.dispatch(PagerAction::TotalPages(total_pages));
                        }
                        Err(err) => {
                            log::error!("loading teacher commissions failed: {}", err);
                            alert("حدث خطأ أثناء تحميل بيانات العمولات");
                        }
                    }
                    loading.set(false);
                });
                || ()
            },
            (app.client.clone(), page, reload.0),
        );
    }

    // Shared tail of every pay action: reload the list and the summary.
    let after_payment = {
        let reload = reload.clone();
        let refresh_summary = app.refresh_summary.clone();
        Callback::from(move |_: ()| {
            reload.dispatch(());
            refresh_summary.emit(());
        })
    };

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
            teacher_filter.clone(),
            month_filter.clone(),
            status_filter.clone(),
            class_filter.clone(),
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

    let on_group_key = {
        let group_key = group_key.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            group_key.set(GroupKey::from_value(&select.value()));
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

    let on_quick_pay = {
        let client = app.client.clone();
        let after_payment = after_payment.clone();
        Callback::from(move |id: String| {
            let client = client.clone();
            let after_payment = after_payment.clone();
            spawn_local(async move {
                match pay_single(&client, &id).await {
                    Ok(message) => {
                        alert(&message);
                        after_payment.emit(());
                    }
                    Err(err) => {
                        log::error!("paying commission {} failed: {}", id, err);
                        alert(&err.alert_text("حدث خطأ أثناء دفع العمولة"));
                    }
                }
            });
        })
    };

    let on_pay_group = {
        let client = app.client.clone();
        let after_payment = after_payment.clone();
        Callback::from(move |ids: Vec<String>| {
            if ids.is_empty() {
                alert("لا توجد عمولات معلقة في هذه المجموعة");
                return;
            }
            if !confirm(&format!("هل تريد بالتأكيد دفع {} عمولة معلقة؟", ids.len())) {
                return;
            }
            let client = client.clone();
            let after_payment = after_payment.clone();
            spawn_local(async move {
                dispatch_all(
                    ids,
                    |id| {
                        let client = client.clone();
                        async move { pay_single(&client, &id).await }
                    },
                    |outcome| {
                        alert(&outcome.commissions_summary());
                        after_payment.emit(());
                    },
                )
                .await;
            });
        })
    };

    let on_pay_month = {
        let client = app.client.clone();
        let after_payment = after_payment.clone();
        let statement = statement.clone();
        let currency_symbol = currency_symbol.clone();
        Callback::from(move |(teacher_id, month, teacher_name): (String, String, String)| {
            if !confirm(&format!("هل تريد دفع مستحقات {} لشهر {}؟", teacher_name, month)) {
                return;
            }
            let client = client.clone();
            let after_payment = after_payment.clone();
            let statement = statement.clone();
            let currency_symbol = currency_symbol.clone();
            spawn_local(async move {
                match pay_teacher_month(&client, &teacher_id, &month).await {
                    Ok(outcome) => {
                        match outcome {
                            MonthPaid::Statement(paid) => {
                                alert(&format!(
                                    "تم دفع {} مستحقات بإجمالي {}",
                                    paid.lines.len(),
                                    format_currency(paid.total, &currency_symbol)
                                ));
                                statement.set(Some(paid));
                            }
                            MonthPaid::NothingToPrint => alert("تم الدفع ولكن لا توجد بيانات للفاتورة"),
                            MonthPaid::Unlisted(err) => {
                                log::error!("listing paid commissions of {} failed: {}", teacher_id, err);
                                alert("تم الدفع ولكن تعذر تحميل بيانات الفاتورة");
                            }
                        }
                        after_payment.emit(());
                    }
                    Err(err) => {
                        log::error!("paying {} for {} failed: {}", teacher_id, month, err);
                        alert(&format!(
                            "حدث خطأ أثناء دفع المستحقات: {}",
                            err.server_message().unwrap_or("فشل في دفع المستحقات")
                        ));
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

    let on_open_single = {
        let client = app.client.clone();
        let dialog = dialog.clone();
        let form_method = form_method.clone();
        let form_date = form_date.clone();
        Callback::from(move |id: String| {
            let client = client.clone();
            let dialog = dialog.clone();
            let form_method = form_method.clone();
            let form_date = form_date.clone();
            spawn_local(async move {
                match client
                    .get::<TeacherCommission>(
                        &format!("{}/{}", COMMISSIONS_PATH, id),
                        &QueryParams::new(),
                    )
                    .await
                {
                    Ok(commission) => {
                        form_method.set("cash".to_string());
                        form_date.set(iso_date(today()));
                        dialog.set(Some(PayDialog::Single(commission)));
                    }
                    Err(err) => {
                        log::error!("loading commission {} failed: {}", id, err);
                        alert("حدث خطأ أثناء تحميل بيانات العمولة");
                    }
                }
            });
        })
    };

    let on_open_class = {
        let client = app.client.clone();
        let dialog = dialog.clone();
        let form_method = form_method.clone();
        let form_date = form_date.clone();
        let form_percentage = form_percentage.clone();
        Callback::from(move |target: ClassPayTarget| {
            let client = client.clone();
            let dialog = dialog.clone();
            let form_method = form_method.clone();
            let form_date = form_date.clone();
            let form_percentage = form_percentage.clone();
            spawn_local(async move {
                let class_id = linked_id(&target.class).to_string();
                let details = if class_id.is_empty() {
                    Ok(ClassDetails::default())
                } else {
                    client
                        .get::<ClassDetails>(&format!("/classes/{}", class_id), &QueryParams::new())
                        .await
                };
                match details {
                    Ok(details) => {
                        form_method.set("cash".to_string());
                        form_date.set(iso_date(today()));
                        form_percentage.set(details.teacher_percentage().normalize().to_string());
                        dialog.set(Some(PayDialog::Class(target)));
                    }
                    Err(err) => {
                        log::error!("loading class {} failed: {}", class_id, err);
                        alert("حدث خطأ أثناء تحميل بيانات العمولة");
                    }
                }
            });
        })
    };

    let on_close_dialog = {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(None))
    };

    let on_submit_dialog = {
        let client = app.client.clone();
        let after_payment = after_payment.clone();
        let dialog = dialog.clone();
        let form_method = form_method.clone();
        let form_date = form_date.clone();
        let form_percentage = form_percentage.clone();
        let busy = busy.clone();
        Callback::from(move |_| {
            let Some(current) = (*dialog).clone() else {
                return;
            };
            let client = client.clone();
            let after_payment = after_payment.clone();
            let dialog = dialog.clone();
            let busy = busy.clone();
            let method = (*form_method).clone();
            let date = (*form_date).clone();
            let percentage = match (&current, parse_percentage(&form_percentage)) {
                (PayDialog::Class(_), None) => {
                    alert("يرجى إدخال نسبة صحيحة بين 0 و 100");
                    return;
                }
                (_, parsed) => parsed.unwrap_or_default(),
            };
            busy.set(true);
            spawn_local(async move {
                let (result, fallback, failure) = match &current {
                    PayDialog::Single(commission) => {
                        let body = CommissionPayment {
                            commission_id: commission.id.clone(),
                            payment_method: method,
                            payment_date: date,
                        };
                        (
                            client
                                .post_text(&format!("{}/pay", COMMISSIONS_PATH), &body)
                                .await,
                            "تم دفع العمولة بنجاح",
                            "حدث خطأ أثناء دفع العمولة",
                        )
                    }
                    PayDialog::Class(target) => {
                        let body = target.payment(&method, &date, percentage);
                        (
                            client
                                .post_text(&format!("{}/pay-by-class", COMMISSIONS_PATH), &body)
                                .await,
                            "تم دفع عمولة الحصة بنجاح",
                            "حدث خطأ أثناء دفع عمولة الحصة",
                        )
                    }
                };
                match result {
                    Ok(reply) => {
                        alert(&reply_message(&reply).unwrap_or_else(|| fallback.to_string()));
                        dialog.set(None);
                        after_payment.emit(());
                    }
                    Err(err) => {
                        log::error!("commission payment failed: {}", err);
                        alert(&err.alert_text(failure));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_pay_all_teachers = {
        let client = app.client.clone();
        let after_payment = after_payment.clone();
        Callback::from(move |_| {
            if !confirm("هل تريد بالتأكيد دفع جميع مستحقات الأساتذة؟") {
                return;
            }
            let client = client.clone();
            let after_payment = after_payment.clone();
            spawn_local(async move {
                let body = SalaryRun {
                    payment_method: "cash".to_string(),
                    payment_date: iso_date(today()),
                };
                match client.post_text("/teachers/pay-all-salaries", &body).await {
                    Ok(reply) => {
                        alert(
                            &reply_message(&reply)
                                .unwrap_or_else(|| "تم دفع جميع مستحقات الأساتذة".to_string()),
                        );
                        after_payment.emit(());
                    }
                    Err(err) => {
                        log::error!("paying all teachers failed: {}", err);
                        alert(&err.alert_text("حدث خطأ أثناء دفع مستحقات الأساتذة"));
                    }
                }
            });
        })
    };

    let groups = group_commissions(&commissions, *group_key);
    let overall = CommissionTotals::of(commissions.iter());

    let filter_bar = html! {
        <div class="bg-card rounded-lg border border-border p-4 grid grid-cols-1 md:grid-cols-6 gap-3 items-end">
            { field("الأستاذ", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&teacher_filter)}>
                    { select_options(&lookup_options(&teachers, "كل الأساتذة"), &teacher_filter) }
                </select>
            }) }
            { field("الشهر", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&month_filter)}>
                    <option value="" selected={month_filter.is_empty()}>{"كل الأشهر"}</option>
                    { select_options(&months, &month_filter) }
                </select>
            }) }
            { field("الحالة", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&status_filter)}>
                    { select_options(&[
                        (String::new(), "الكل".to_string()),
                        ("pending".to_string(), Status::Pending.label().to_string()),
                        ("paid".to_string(), Status::Paid.label().to_string()),
                    ], &status_filter) }
                </select>
            }) }
            { field("الحصة", html! {
                <select class={INPUT_CLASS} onchange={bind_select(&class_filter)}>
                    { select_options(&lookup_options(&classes, "كل الحصص"), &class_filter) }
                </select>
            }) }
            { field("التجميع", html! {
                <select class={INPUT_CLASS} onchange={on_group_key}>
                    { for GroupKey::ALL.iter().map(|key| html! {
                        <option value={key.value()} selected={*key == *group_key}>{ key.label() }</option>
                    }) }
                </select>
            }) }
            <div class="flex gap-2">
                <button class={PRIMARY_BUTTON} onclick={on_apply}>{"تصفية"}</button>
                <button class={SECONDARY_BUTTON} onclick={on_clear}>{"مسح"}</button>
            </div>
        </div>
    };

    let group_cards = match ListBody::choose(*loading, groups.len()) {
        ListBody::Loading => html! { <p class="text-center text-muted-foreground py-6">{"جاري التحميل..."}</p> },
        ListBody::Empty => html! { <p class="text-center text-muted-foreground py-6">{"لا توجد عمولات"}</p> },
        ListBody::Rows => html! {
            <>
                { for groups.iter().map(|group| {
                    let pay_group = {
                        let on_pay_group = on_pay_group.clone();
                        let ids = group.pending_ids();
                        Callback::from(move |_| on_pay_group.emit(ids.clone()))
                    };
                    let class_target = ClassPayTarget::for_group(group, &month_filter)
                        .filter(|target| target.collected > Decimal::ZERO);
                    let pay_class = class_target.map(|target| {
                        let on_open_class = on_open_class.clone();
                        Callback::from(move |_| on_open_class.emit(target.clone()))
                    });
                    let has_pending = group.pending().next().is_some();
                    let pay_month = match (group.key, group.month.clone()) {
                        (GroupKey::ByTeacherMonth, Some(month)) => {
                            let on_pay_month = on_pay_month.clone();
                            let request = (linked_id(&group.teacher).to_string(), month, linked_name(&group.teacher));
                            Some(Callback::from(move |_| on_pay_month.emit(request.clone())))
                        }
                        _ => None,
                    };
                    html! {
                        <div class="bg-card rounded-lg border border-border overflow-hidden">
                            <div class="px-6 py-4 border-b border-border flex flex-wrap items-center justify-between gap-3">
                                <div class="space-y-2">
                                    <h3 class="text-lg font-bold text-foreground">{ group.title() }</h3>
                                    { totals_badges(&group.totals, &currency_symbol) }
                                </div>
                                <div class="flex gap-2">
                                    if has_pending {
                                        if let Some(pay_month) = pay_month {
                                            <button class={SMALL_SUCCESS_BUTTON} onclick={pay_month}>{"دفع وطباعة الفاتورة"}</button>
                                        } else {
                                            <button class={SMALL_SUCCESS_BUTTON} onclick={pay_group}>{"دفع الكل"}</button>
                                        }
                                    }
                                    if let Some(pay_class) = pay_class {
                                        <button class={SMALL_BUTTON} onclick={pay_class}>{"دفع عمولة الحصة"}</button>
                                    }
                                </div>
                            </div>
                            <div class="overflow-x-auto">
                                <table class="w-full border-collapse">
                                    <thead class="bg-secondary border-b border-border">
                                        <tr>
                                            <th class={TH_CLASS}>{"الطالب"}</th>
                                            <th class={TH_CLASS}>{"الحصة"}</th>
                                            <th class={TH_CLASS}>{"الشهر"}</th>
                                            <th class={TH_CLASS}>{"المبلغ"}</th>
                                            <th class={TH_CLASS}>{"النسبة"}</th>
                                            <th class={TH_CLASS}>{"الحالة"}</th>
                                            <th class={TH_CLASS}>{"تاريخ الدفع"}</th>
                                            <th class={TH_CLASS}>{"إجراءات"}</th>
                                        </tr>
                                    </thead>
                                    <tbody class="divide-y divide-border">
                                        { for group.records.iter().map(|record| {
                                            let quick = {
                                                let on_quick_pay = on_quick_pay.clone();
                                                let id = record.id.clone();
                                                Callback::from(move |_| on_quick_pay.emit(id.clone()))
                                            };
                                            let detailed = {
                                                let on_open_single = on_open_single.clone();
                                                let id = record.id.clone();
                                                Callback::from(move |_| on_open_single.emit(id.clone()))
                                            };
                                            html! {
                                                <tr key={record.id.clone()} class="text-sm hover:bg-muted/30 transition-colors">
                                                    <td class={TD_CLASS}>{ linked_name(&record.student) }</td>
                                                    <td class={TD_CLASS}>{ linked_name(&record.class) }</td>
                                                    <td class={TD_CLASS}>{ record.month.clone() }</td>
                                                    <td class={TD_CLASS}>{ format_currency(record.amount, &currency_symbol) }</td>
                                                    <td class={TD_CLASS}>{ format!("{}%", record.percentage.normalize()) }</td>
                                                    <td class={TD_CLASS}>{ status_badge(record.status) }</td>
                                                    <td class={TD_CLASS}>{ short_date(record.payment_date.as_deref().unwrap_or_default()) }</td>
                                                    <td class={classes!(TD_CLASS, "space-x-2")}>
                                                        if record.status == Status::Pending {
                                                            <button class={SMALL_SUCCESS_BUTTON} onclick={quick}>{"دفع"}</button>
                                                            <button class={SMALL_BUTTON} onclick={detailed}>{"دفع مع تفاصيل"}</button>
                                                        }
                                                    </td>
                                                </tr>
                                            }
                                        }) }
                                    </tbody>
                                </table>
                            </div>
                        </div>
                    }
                }) }
            </>
        },
    };

    let dialog_view = match &*dialog {
        None => html! {},
        Some(current) => {
            let (title, summary) = match current {
                PayDialog::Single(commission) => (
                    "دفع عمولة".to_string(),
                    html! {
                        <div class="text-sm space-y-1">
                            <p>{ format!("الأستاذ: {}", linked_name(&commission.teacher)) }</p>
                            <p>{ format!("الشهر: {}", commission.month) }</p>
                            <p>{ format!("المبلغ: {}", format_currency(commission.amount, &currency_symbol)) }</p>
                        </div>
                    },
                ),
                PayDialog::Class(target) => {
                    let amount = parse_percentage(&form_percentage)
                        .and_then(|p| class_commission_amount(target.collected, p))
                        .map(|amount| format_currency(amount, &currency_symbol))
                        .unwrap_or_else(|| "---".to_string());
                    (
                        "دفع عمولة الحصة".to_string(),
                        html! {
                            <div class="space-y-3">
                                <div class="text-sm space-y-1">
                                    <p>{ format!("الأستاذ: {}", linked_name(&target.teacher)) }</p>
                                    <p>{ format!("الحصة: {}", linked_name(&target.class)) }</p>
                                    <p>{ format!("الشهر: {}", target.month) }</p>
                                    <p>{ format!("المبلغ المحصل: {}", format_currency(target.collected, &currency_symbol)) }</p>
                                </div>
                                { field("النسبة (%)", html! {
                                    <input type="number" class={INPUT_CLASS} value={(*form_percentage).clone()} oninput={bind_input(&form_percentage)} />
                                }) }
                                <p class="text-sm font-bold">{ format!("مبلغ العمولة: {}", amount) }</p>
                            </div>
                        },
                    )
                }
            };
            html! {
                <Modal title={title} on_close={on_close_dialog}>
                    { summary }
                    { field("طريقة الدفع", html! {
                        <select class={INPUT_CLASS} onchange={bind_select(&form_method)}>
                            { select_options(&payment_method_options(None), &form_method) }
                        </select>
                    }) }
                    { field("تاريخ الدفع", html! {
                        <input type="date" class={INPUT_CLASS} value={(*form_date).clone()} oninput={bind_input(&form_date)} />
                    }) }
                    <button class={PRIMARY_BUTTON} onclick={on_submit_dialog} disabled={*busy}>
                        { if *busy { "جاري الدفع..." } else { "تأكيد الدفع" } }
                    </button>
                </Modal>
            }
        }
    };

    let statement_modal = match &*statement {
        None => html! {},
        Some(paid) => html! {
            <Modal title={format!("فاتورة {}", paid.teacher)} on_close={{
                let statement = statement.clone();
                Callback::from(move |_| statement.set(None))
            }}>
                { statement_view(paid, &currency_symbol) }
                <button class={SECONDARY_BUTTON} onclick={on_print}>{"طباعة"}</button>
            </Modal>
        },
    };

    html! {
        { page_shell(
            "عمولات الأساتذة",
            html! {
                <button onclick={on_pay_all_teachers} class={PRIMARY_BUTTON}>{"دفع جميع المستحقات"}</button>
            },
            html! {
                <>
                    { filter_bar }
                    <div class="bg-card rounded-lg border border-border p-4 flex items-center justify-between">
                        <span class="font-bold text-foreground">{"إجمالي العمولات"}</span>
                        { totals_badges(&overall, &currency_symbol) }
                    </div>
                    { group_cards }
                    if !commissions.is_empty() {
                        <div class="flex items-center justify-end gap-3">
                            <button class={SECONDARY_BUTTON} onclick={on_prev}>{"السابق"}</button>
                            <span class="text-sm text-muted-foreground">{ pager.label() }</span>
                            <button class={SECONDARY_BUTTON} onclick={on_next}>{"التالي"}</button>
                        </div>
                    }
                    { dialog_view }
                    { statement_modal }
                </>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commission(id: &str, class: &str, month: &str, amount: i64, status: &str) -> TeacherCommission {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "teacher": { "_id": "t1", "name": "سمير" },
            "class": { "_id": class, "name": class },
            "month": month,
            "amount": amount,
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn commission_query_carries_paging_and_filters() {
        let filters = CommissionFilters {
            teacher: "t1".to_string(),
            status: "pending".to_string(),
            ..CommissionFilters::default()
        };
        let query = filters.query(&Pager::new(COMMISSIONS_PER_PAGE));
        assert_eq!(query.get("limit"), Some("10"));
        assert_eq!(query.get("page"), Some("1"));
        assert_eq!(query.get("teacher"), Some("t1"));
        assert_eq!(query.get("month"), None);
    }

    #[test]
    fn class_target_uses_pending_total_and_group_month() {
        let records = vec![
            commission("1", "math", "2024-03", 1000, "pending"),
            commission("2", "math", "2024-03", 300, "pending"),
            commission("3", "math", "2024-03", 500, "paid"),
        ];
        let groups = group_commissions(&records, GroupKey::ByTeacherClass);
        let target = ClassPayTarget::for_group(&groups[0], "").unwrap();
        assert_eq!(target.month, "2024-03");
        assert_eq!(target.collected, Decimal::from(1300));

        let body = target.payment("cash", "2024-03-31", Decimal::from(DEFAULT_CLASS_PERCENTAGE));
        assert_eq!(body.teacher_id, "t1");
        assert_eq!(body.class_id, "math");
        assert_eq!(
            class_commission_amount(target.collected, body.percentage),
            Some(Decimal::from(910))
        );
    }

    #[test]
    fn class_target_needs_a_month() {
        let records = vec![
            commission("1", "math", "2024-02", 1000, "pending"),
            commission("2", "math", "2024-03", 300, "pending"),
        ];
        let groups = group_commissions(&records, GroupKey::ByTeacherClass);
        assert!(ClassPayTarget::for_group(&groups[0], "").is_none());
        assert_eq!(
            ClassPayTarget::for_group(&groups[0], "2024-03").map(|t| t.month),
            Some("2024-03".to_string())
        );

        let by_teacher = group_commissions(&records, GroupKey::ByTeacher);
        assert!(ClassPayTarget::for_group(&by_teacher[0], "2024-03").is_none());
    }

    #[test]
    fn percentage_must_be_within_bounds() {
        assert_eq!(parse_percentage(" 70 "), Some(Decimal::from(70)));
        assert_eq!(parse_percentage("12.5"), Some(Decimal::new(125, 1)));
        assert_eq!(parse_percentage("101"), None);
        assert_eq!(parse_percentage("-1"), None);
        assert_eq!(parse_percentage("abc"), None);
    }

    #[test]
    fn month_statement_asks_for_paid_records_only() {
        let query = month_paid_query("t1", "2024-03");
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(
            pairs,
            vec![("teacher", "t1"), ("month", "2024-03"), ("status", "paid")]
        );
    }
}
