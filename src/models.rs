use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_NAME: &str = "غير معروف";

/// A referenced document as the server returns it: populated `{ _id, name }`
/// or just the id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Linked {
    Doc(NamedDoc),
    Id(String),
}

impl Linked {
    pub fn id(&self) -> &str {
        match self {
            Linked::Doc(doc) => &doc.id,
            Linked::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Linked::Doc(doc) if !doc.name.is_empty() => Some(&doc.name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NamedDoc {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Dropdown entries for classes, teachers and students.
pub type Lookup = NamedDoc;

pub fn linked_name(link: &Option<Linked>) -> String {
    link.as_ref()
        .and_then(Linked::name)
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

pub fn linked_id(link: &Option<Linked>) -> &str {
    link.as_ref().map(Linked::id).unwrap_or("")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Paid,
    Late,
    Overdue,
    #[serde(other)]
    Other,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Paid => "مدفوع",
            Status::Pending => "معلق",
            Status::Late | Status::Overdue => "متأخر",
            Status::Other => "",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Status::Paid => "bg-emerald-100 text-emerald-700",
            Status::Pending => "bg-amber-100 text-amber-700",
            Status::Late | Status::Overdue => "bg-red-100 text-red-700",
            Status::Other => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub student: Option<Linked>,
    #[serde(default)]
    pub class: Option<Linked>,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub payment_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub recipient: Option<Linked>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCommission {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub teacher: Option<Linked>,
    #[serde(default)]
    pub student: Option<Linked>,
    #[serde(default)]
    pub class: Option<Linked>,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub percentage: Decimal,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub payment_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub recipient: Option<Linked>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Row of the dashboard's recent activity feed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: Option<Status>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == "income"
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Collection endpoints answer with either a bare array or a paged envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Paged {
        #[serde(
            alias = "payments",
            alias = "commissions",
            alias = "expenses",
            alias = "invoices",
            alias = "students",
            alias = "teachers",
            alias = "classes",
            alias = "data"
        )]
        items: Vec<T>,
        #[serde(rename = "totalPages", default)]
        total_pages: Option<u32>,
    },
}

impl<T> Listing<T> {
    pub fn into_parts(self) -> (Vec<T>, Option<u32>) {
        match self {
            Listing::Bare(items) => (items, None),
            Listing::Paged { items, total_pages } => (items, total_pages),
        }
    }
}

pub fn payment_method_label(method: &str) -> &str {
    match method {
        "cash" => "نقدي",
        "bank" => "تحويل بنكي",
        "online" => "دفع إلكتروني",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_and_bare_references_both_parse() {
        let raw = r#"[
            {"_id": "p1", "student": {"_id": "s1", "name": "Amine"}, "class": "c9",
             "month": "2024-03", "amount": 1500, "paymentMethod": "cash", "status": "paid"},
            {"_id": "p2", "month": "2024-03", "amount": 1200.5, "status": "late"}
        ]"#;
        let payments: Vec<Payment> = serde_json::from_str(raw).unwrap();

        assert_eq!(linked_name(&payments[0].student), "Amine");
        assert_eq!(linked_id(&payments[0].class), "c9");
        assert_eq!(linked_name(&payments[0].class), UNKNOWN_NAME);
        assert_eq!(payments[1].status, Status::Late);
        assert_eq!(payments[1].amount, Decimal::new(12005, 1));
        assert_eq!(linked_name(&payments[1].student), UNKNOWN_NAME);
    }

    #[test]
    fn unknown_status_does_not_fail_the_listing() {
        let raw = r#"{"_id": "i1", "invoiceNumber": "INV-1", "status": "cancelled", "totalAmount": 10}"#;
        let invoice: Invoice = serde_json::from_str(raw).unwrap();
        assert_eq!(invoice.status, Status::Other);
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn listing_accepts_paged_and_bare_shapes() {
        let paged: Listing<Payment> =
            serde_json::from_str(r#"{"payments": [{"_id": "a"}], "totalPages": 4}"#).unwrap();
        let (items, pages) = paged.into_parts();
        assert_eq!(items.len(), 1);
        assert_eq!(pages, Some(4));

        let bare: Listing<Payment> = serde_json::from_str(r#"[{"_id": "a"}, {"_id": "b"}]"#).unwrap();
        let (items, pages) = bare.into_parts();
        assert_eq!(items.len(), 2);
        assert_eq!(pages, None);
    }

    #[test]
    fn payment_methods_have_arabic_labels() {
        assert_eq!(payment_method_label("cash"), "نقدي");
        assert_eq!(payment_method_label("bank"), "تحويل بنكي");
        assert_eq!(payment_method_label("cheque"), "cheque");
    }
}
