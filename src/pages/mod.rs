pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod invoices;
pub mod payments;
pub mod reports;
pub mod settings;
pub mod teachers;

use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::filters::QueryParams;
use crate::models::{Listing, Lookup};

/// Shared with every page: the authenticated gateway, and a trigger that
/// re-fetches the summary bar after money moved.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub client: ApiClient,
    pub refresh_summary: Callback<()>,
}

/// Counter that list fetches and the summary bar are keyed on. Every
/// dispatch moves it on, even when several land between two renders.
#[derive(Debug, Default, PartialEq)]
pub struct Tick(pub u64);

impl Reducible for Tick {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Tick(self.0.wrapping_add(1)))
    }
}

#[hook]
pub fn use_app() -> AppContext {
    use_context::<AppContext>().unwrap_or_else(|| AppContext {
        client: ApiClient::default(),
        refresh_summary: Callback::noop(),
    })
}

/// Dropdown data for `/classes`, `/teachers` or `/students`.
#[hook]
pub fn use_lookup(path: &'static str) -> Vec<Lookup> {
    let app = use_app();
    let items = use_state(Vec::<Lookup>::new);

    {
        let items = items.clone();
        use_effect_with_deps(
            move |client: &ApiClient| {
                let client = client.clone();
                spawn_local(async move {
                    match client.get::<Listing<Lookup>>(path, &QueryParams::new()).await {
                        Ok(listing) => items.set(listing.into_parts().0),
                        Err(err) => log::error!("loading {} failed: {}", path, err),
                    }
                });
                || ()
            },
            app.client,
        );
    }

    (*items).clone()
}

pub fn lookup_options(items: &[Lookup], placeholder: &str) -> Vec<(String, String)> {
    std::iter::once((String::new(), placeholder.to_string()))
        .chain(items.iter().map(|item| (item.id.clone(), item.name.clone())))
        .collect()
}

pub fn payment_method_options(placeholder: Option<&str>) -> Vec<(String, String)> {
    let methods = ["cash", "bank", "online"]
        .into_iter()
        .map(|m| (m.to_string(), crate::models::payment_method_label(m).to_string()));
    match placeholder {
        Some(label) => std::iter::once((String::new(), label.to_string()))
            .chain(methods)
            .collect(),
        None => methods.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_from_the_same_render_each_count() {
        let seen = Rc::new(Tick::default());
        // Two payments finishing before a re-render both dispatch against the
        // latest state, not the value their callbacks captured.
        let after_first = seen.clone().reduce(());
        let after_second = after_first.reduce(());
        assert_eq!(seen.0, 0);
        assert_eq!(after_second.0, 2);
    }

    #[test]
    fn lookup_options_lead_with_a_blank_choice() {
        let items = vec![Lookup {
            id: "c1".to_string(),
            name: "رياضيات".to_string(),
        }];
        let options = lookup_options(&items, "كل الحصص");
        assert_eq!(options[0], (String::new(), "كل الحصص".to_string()));
        assert_eq!(options[1], ("c1".to_string(), "رياضيات".to_string()));
    }

    #[test]
    fn payment_methods_optionally_include_any() {
        assert_eq!(payment_method_options(None).len(), 3);
        let with_any = payment_method_options(Some("الكل"));
        assert_eq!(with_any.len(), 4);
        assert_eq!(with_any[1].1, "نقدي");
    }
}
