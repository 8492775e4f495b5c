use yew::prelude::*;

use crate::settings::{currency_symbol_for, save_settings, AccountingSettings, SettingsError};
use crate::storage::BrowserStorage;
use crate::ui::{
    alert, bind_input, bind_select, bind_textarea, field, page_shell, select_options,
    INPUT_CLASS, PRIMARY_BUTTON,
};

const CURRENCIES: [&str; 6] = ["DZD", "USD", "EUR", "MAD", "TND", "SAR"];

fn currency_options() -> Vec<(String, String)> {
    CURRENCIES
        .iter()
        .map(|code| (code.to_string(), format!("{} ({})", code, currency_symbol_for(code))))
        .collect()
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let settings = use_context::<UseStateHandle<AccountingSettings>>();
    let current = settings
        .as_ref()
        .map(|handle| (**handle).clone())
        .unwrap_or_default();

    let school_name = use_state(|| current.school_name.clone());
    let currency = use_state(|| current.currency.clone());
    let tax_rate = use_state(|| current.tax_rate.clone());
    let invoice_prefix = use_state(|| current.invoice_prefix.clone());
    let payment_terms = use_state(|| current.payment_terms.clone());
    let late_fee = use_state(|| current.late_fee.clone());
    let school_address = use_state(|| current.school_address.clone());
    let school_contact = use_state(|| current.school_contact.clone());

    let on_save = {
        let settings = settings.clone();
        let fields = (
            school_name.clone(),
            currency.clone(),
            tax_rate.clone(),
            invoice_prefix.clone(),
            payment_terms.clone(),
            late_fee.clone(),
            school_address.clone(),
            school_contact.clone(),
        );
        Callback::from(move |_| {
            let next = AccountingSettings {
                school_name: (*fields.0).clone(),
                currency: (*fields.1).clone(),
                tax_rate: (*fields.2).clone(),
                invoice_prefix: (*fields.3).clone(),
                payment_terms: (*fields.4).clone(),
                late_fee: (*fields.5).clone(),
                school_address: (*fields.6).clone(),
                school_contact: (*fields.7).clone(),
            };
            match save_settings(&BrowserStorage, &next) {
                Ok(()) => {
                    if let Some(settings) = settings.as_ref() {
                        settings.set(next);
                    }
                    alert("تم حفظ الإعدادات بنجاح");
                }
                Err(SettingsError::Storage(err)) => {
                    log::error!("saving settings failed: {}", err);
                    alert("حدث خطأ أثناء حفظ الإعدادات");
                }
                Err(invalid) => alert(&invalid.to_string()),
            }
        })
    };

    html! {
        { page_shell(
            "الإعدادات",
            html! {},
            html! {
                <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                    <div class="bg-card rounded-lg p-6 border border-border space-y-4">
                        <h2 class="text-xl font-bold text-foreground">{"المؤسسة"}</h2>
                        { field("اسم المؤسسة", html! {
                            <input type="text" class={INPUT_CLASS} value={(*school_name).clone()} oninput={bind_input(&school_name)} />
                        }) }
                        { field("العنوان", html! {
                            <textarea class={INPUT_CLASS} rows="2" value={(*school_address).clone()} oninput={bind_textarea(&school_address)} />
                        }) }
                        { field("معلومات الاتصال", html! {
                            <textarea class={INPUT_CLASS} rows="3" value={(*school_contact).clone()} oninput={bind_textarea(&school_contact)} />
                        }) }
                    </div>

                    <div class="bg-card rounded-lg p-6 border border-border space-y-4">
                        <h2 class="text-xl font-bold text-foreground">{"المحاسبة"}</h2>
                        { field("العملة", html! {
                            <select class={INPUT_CLASS} onchange={bind_select(&currency)}>
                                { select_options(&currency_options(), &currency) }
                            </select>
                        }) }
                        { field("نسبة الضريبة (%)", html! {
                            <input type="number" class={INPUT_CLASS} value={(*tax_rate).clone()} oninput={bind_input(&tax_rate)} />
                        }) }
                        { field("بادئة الفواتير", html! {
                            <input type="text" class={INPUT_CLASS} value={(*invoice_prefix).clone()} oninput={bind_input(&invoice_prefix)} />
                        }) }
                        { field("مدة السداد (أيام)", html! {
                            <input type="number" class={INPUT_CLASS} value={(*payment_terms).clone()} oninput={bind_input(&payment_terms)} />
                        }) }
                        { field("غرامة التأخير (%)", html! {
                            <input type="number" class={INPUT_CLASS} value={(*late_fee).clone()} oninput={bind_input(&late_fee)} />
                        }) }
                        <p class="text-xs text-muted-foreground">{"تطبق العملة على جميع الصفحات والتقارير."}</p>
                    </div>

                    <div class="md:col-span-2">
                        <button class={PRIMARY_BUTTON} onclick={on_save}>{"حفظ الإعدادات"}</button>
                    </div>
                </div>
            }
        ) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_choices_show_their_symbol() {
        let options = currency_options();
        assert_eq!(options[0], ("DZD".to_string(), "DZD (د.ج)".to_string()));
        assert!(options.iter().any(|(code, label)| code == "EUR" && label.ends_with("(€)")));
    }
}
