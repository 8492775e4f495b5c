use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::session::{login_error_text, request_login, Session, SessionStore};
use crate::storage::BrowserStorage;
use crate::ui::{bind_input, INPUT_CLASS};

#[derive(Properties, PartialEq)]
pub struct LoginScreenProps {
    pub on_authenticated: Callback<Session>,
}

#[function_component(LoginScreen)]
pub fn login_screen(props: &LoginScreenProps) -> Html {
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        let on_authenticated = props.on_authenticated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let username_val = username.trim().to_string();
            let password_val = (*password).clone();

            if username_val.is_empty() || password_val.is_empty() {
                error.set(Some("يرجى إدخال اسم المستخدم وكلمة المرور".to_string()));
                return;
            }

            loading.set(true);
            error.set(None);

            let error = error.clone();
            let loading = loading.clone();
            let on_authenticated = on_authenticated.clone();
            spawn_local(async move {
                match request_login(&username_val, &password_val).await {
                    Ok(response) => match SessionStore::new(BrowserStorage).establish(response) {
                        Ok(session) => {
                            log::info!("signed in as {}", session.user.username);
                            on_authenticated.emit(session);
                        }
                        Err(err) => {
                            log::error!("could not persist session: {}", err);
                            error.set(Some("تعذر حفظ الجلسة على هذا الجهاز".to_string()));
                        }
                    },
                    Err(err) => {
                        log::error!("login failed: {}", err);
                        error.set(Some(login_error_text(&err)));
                    }
                }
                loading.set(false);
            });
        })
    };

    html! {
        <div dir="rtl" class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{"نظام المحاسبة"}</h1>
                    <p class="text-sm text-muted-foreground mt-2">{"سجل الدخول للمتابعة."}</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"اسم المستخدم"}</label>
                        <input type="text" class={INPUT_CLASS} value={(*username).clone()} oninput={bind_input(&username)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"كلمة المرور"}</label>
                        <input type="password" class={INPUT_CLASS} value={(*password).clone()} oninput={bind_input(&password)} />
                    </div>

                    if let Some(msg) = &*error {
                        <div class="text-sm text-red-500">{ msg.clone() }</div>
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "جاري الدخول..." } else { "تسجيل الدخول" } }
                    </button>
                </form>
            </div>
        </div>
    }
}
