use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportKind {
    #[default]
    Financial,
    Income,
    Expense,
    Teacher,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Financial,
        ReportKind::Income,
        ReportKind::Expense,
        ReportKind::Teacher,
    ];

    pub fn value(self) -> &'static str {
        match self {
            ReportKind::Financial => "financial",
            ReportKind::Income => "income",
            ReportKind::Expense => "expense",
            ReportKind::Teacher => "teacher",
        }
    }

    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.value() == value)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Financial => "التقرير المالي",
            ReportKind::Income => "تقرير الإيرادات",
            ReportKind::Expense => "تقرير المصروفات",
            ReportKind::Teacher => "تقرير مدفوعات الأساتذة",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            ReportKind::Financial => "/accounting/reports/financial",
            ReportKind::Income => "/accounting/reports/summary",
            ReportKind::Expense => "/accounting/expense-report",
            ReportKind::Teacher => "/accounting/reports/teacher-payments",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub amount: Decimal,
    /// Percentage of the report total, two decimals.
    pub share: Decimal,
}

fn decimal_at(value: &Value, key: &str) -> Decimal {
    value
        .get(key)
        .and_then(|v| <Decimal as Deserialize>::deserialize(v).ok())
        .unwrap_or_default()
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(doc)) => doc
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn share_of(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (amount / total * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

fn with_shares(rows: Vec<(String, Decimal)>, total: Decimal) -> Vec<ReportRow> {
    rows.into_iter()
        .map(|(label, amount)| ReportRow {
            label,
            amount,
            share: share_of(amount, total),
        })
        .collect()
}

/// Flattens whichever shape the report endpoint returned into table rows.
/// Unexpected shapes yield no rows rather than an error.
pub fn report_rows(kind: ReportKind, report: &Value) -> Vec<ReportRow> {
    let empty = Vec::new();
    match kind {
        ReportKind::Financial => {
            let items = report.as_array().unwrap_or(&empty);
            let rows: Vec<_> = items
                .iter()
                .map(|item| {
                    let label = format!(
                        "{} - {}",
                        text_of(item.get("type")),
                        text_of(item.get("category"))
                    );
                    (label, decimal_at(item, "totalAmount"))
                })
                .collect();
            let total = rows.iter().map(|(_, amount)| *amount).sum();
            with_shares(rows, total)
        }
        ReportKind::Income => vec![ReportRow {
            label: "الإيرادات".to_string(),
            amount: decimal_at(report, "income"),
            share: Decimal::ONE_HUNDRED,
        }],
        ReportKind::Expense => {
            let items = report
                .get("expenses")
                .and_then(Value::as_array)
                .unwrap_or(&empty);
            let rows = items
                .iter()
                .map(|item| (text_of(item.get("_id")), decimal_at(item, "total")))
                .collect();
            with_shares(rows, decimal_at(report, "totalExpenses"))
        }
        ReportKind::Teacher => {
            let items = report.as_array().unwrap_or(&empty);
            let rows: Vec<_> = items
                .iter()
                .map(|item| (text_of(item.get("_id")), decimal_at(item, "totalAmount")))
                .collect();
            let total = rows.iter().map(|(_, amount)| *amount).sum();
            with_shares(rows, total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn financial_rows_share_the_grand_total() {
        let report = json!([
            { "type": "income", "category": "tuition", "totalAmount": 3000 },
            { "type": "expense", "category": "rent", "totalAmount": 1000 }
        ]);
        let rows = report_rows(ReportKind::Financial, &report);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "income - tuition");
        assert_eq!(rows[0].share, Decimal::from(75));
        assert_eq!(rows[1].share, Decimal::from(25));
    }

    #[test]
    fn expense_rows_use_the_reported_total() {
        let report = json!({
            "expenses": [ { "_id": "salaries", "total": 600 }, { "_id": "utilities", "total": 300 } ],
            "totalExpenses": 1200
        });
        let rows = report_rows(ReportKind::Expense, &report);
        assert_eq!(rows[0].label, "salaries");
        assert_eq!(rows[0].share, Decimal::from(50));
        assert_eq!(rows[1].share, Decimal::from(25));
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let report = json!([{ "_id": { "_id": "t1", "name": "Samir" }, "totalAmount": 0 }]);
        let rows = report_rows(ReportKind::Teacher, &report);
        assert_eq!(rows[0].label, "Samir");
        assert_eq!(rows[0].share, Decimal::ZERO);
    }

    #[test]
    fn income_is_a_single_row() {
        let rows = report_rows(ReportKind::Income, &json!({ "income": 4500.5 }));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Decimal::new(45005, 1));
        assert_eq!(rows[0].share, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn unexpected_shapes_yield_no_rows() {
        assert!(report_rows(ReportKind::Financial, &json!({ "oops": true })).is_empty());
        assert!(report_rows(ReportKind::Expense, &json!([])).is_empty());
    }

    #[test]
    fn each_kind_maps_to_its_endpoint() {
        assert_eq!(ReportKind::from_value("expense").endpoint(), "/accounting/expense-report");
        assert_eq!(ReportKind::from_value("nope"), ReportKind::Financial);
    }
}
