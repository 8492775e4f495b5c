//! Teacher commission grouping and the payloads of the commission pay calls.
//!
//! Records come from the server as a flat list. The commissions page buckets
//! them with [`group_commissions`] under one of three [`GroupKey`]s and shows
//! pending/paid subtotals per bucket.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{linked_id, linked_name, Linked, Status, TeacherCommission};

pub const DEFAULT_CLASS_PERCENTAGE: u32 = 70;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupKey {
    ByTeacher,
    #[default]
    ByTeacherClass,
    ByTeacherMonth,
}

impl GroupKey {
    pub const ALL: [GroupKey; 3] = [
        GroupKey::ByTeacher,
        GroupKey::ByTeacherClass,
        GroupKey::ByTeacherMonth,
    ];

    pub fn value(self) -> &'static str {
        match self {
            GroupKey::ByTeacher => "teacher",
            GroupKey::ByTeacherClass => "teacher-class",
            GroupKey::ByTeacherMonth => "teacher-month",
        }
    }

    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.value() == value)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKey::ByTeacher => "حسب الأستاذ",
            GroupKey::ByTeacherClass => "حسب الأستاذ والحصة",
            GroupKey::ByTeacherMonth => "حسب الأستاذ والشهر",
        }
    }

    fn bucket(self, record: &TeacherCommission) -> (String, String) {
        let teacher = linked_id(&record.teacher).to_string();
        match self {
            GroupKey::ByTeacher => (teacher, String::new()),
            GroupKey::ByTeacherClass => (teacher, linked_id(&record.class).to_string()),
            GroupKey::ByTeacherMonth => (teacher, record.month.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommissionTotals {
    pub pending: Decimal,
    pub paid: Decimal,
    pub total: Decimal,
}

impl CommissionTotals {
    /// Only pending and paid records count; anything else is listed but not
    /// summed. Sums saturate at `Decimal::MAX`.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a TeacherCommission>) -> Self {
        let mut totals = Self::default();
        for record in records {
            match record.status {
                Status::Pending => totals.pending = totals.pending.saturating_add(record.amount),
                Status::Paid => totals.paid = totals.paid.saturating_add(record.amount),
                _ => {}
            }
        }
        totals.total = totals.pending.saturating_add(totals.paid);
        totals
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommissionGroup {
    pub key: GroupKey,
    pub teacher: Option<Linked>,
    pub class: Option<Linked>,
    pub month: Option<String>,
    pub records: Vec<TeacherCommission>,
    pub totals: CommissionTotals,
}

impl CommissionGroup {
    pub fn title(&self) -> String {
        let teacher = linked_name(&self.teacher);
        match self.key {
            GroupKey::ByTeacher => teacher,
            GroupKey::ByTeacherClass => format!("{} - {}", teacher, linked_name(&self.class)),
            GroupKey::ByTeacherMonth => {
                format!("{} - {}", teacher, self.month.as_deref().unwrap_or(""))
            }
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &TeacherCommission> {
        self.records
            .iter()
            .filter(|record| record.status == Status::Pending)
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.pending().map(|record| record.id.clone()).collect()
    }

    /// The month shared by every record in the group, when there is one.
    pub fn common_month(&self) -> Option<&str> {
        if let Some(month) = self.month.as_deref() {
            return Some(month);
        }
        let first = self.records.first()?.month.as_str();
        self.records
            .iter()
            .all(|record| record.month == first)
            .then_some(first)
    }
}

/// Buckets records by `key`. Groups come out in the order their key first
/// appears; records keep their input order inside a group.
pub fn group_commissions(records: &[TeacherCommission], key: GroupKey) -> Vec<CommissionGroup> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<CommissionGroup> = Vec::new();

    for record in records {
        let slot = *index.entry(key.bucket(record)).or_insert_with(|| {
            groups.push(CommissionGroup {
                key,
                teacher: record.teacher.clone(),
                class: match key {
                    GroupKey::ByTeacherClass => record.class.clone(),
                    _ => None,
                },
                month: match key {
                    GroupKey::ByTeacherMonth => Some(record.month.clone()),
                    _ => None,
                },
                records: Vec::new(),
                totals: CommissionTotals::default(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record.clone());
    }

    for group in &mut groups {
        group.totals = CommissionTotals::of(&group.records);
    }
    groups
}

/// The teacher's cut of a class's collected amount, `None` on overflow.
pub fn class_commission_amount(collected: Decimal, percentage: Decimal) -> Option<Decimal> {
    Some(
        collected
            .checked_mul(percentage)?
            .checked_div(Decimal::ONE_HUNDRED)?
            .round_dp(2),
    )
}

/// Body of both `teacher-commissions/pay` and `teacher-commissions/pay-single`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionPayment {
    pub commission_id: String,
    pub payment_method: String,
    pub payment_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCommissionPayment {
    pub teacher_id: String,
    pub class_id: String,
    pub month: String,
    pub payment_method: String,
    pub payment_date: String,
    pub percentage: Decimal,
}

/// Body of `POST /teachers/:id/pay-salary`, which settles every pending
/// commission of one teacher for one month.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryPayment {
    pub month: String,
    pub payment_method: String,
    pub payment_date: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatementLine {
    pub description: String,
    pub amount: Decimal,
}

/// Printable record of what a teacher was paid for a month.
#[derive(Clone, Debug, PartialEq)]
pub struct CommissionStatement {
    pub number: String,
    pub teacher: String,
    pub month: String,
    pub lines: Vec<StatementLine>,
    pub total: Decimal,
}

impl CommissionStatement {
    /// One line per paid commission; `None` when there is nothing to print.
    /// `stamp` keeps numbers unique across repeated runs for the same month.
    pub fn from_paid(
        teacher_id: &str,
        month: &str,
        paid: &[TeacherCommission],
        stamp: i64,
    ) -> Option<Self> {
        let first = paid.first()?;
        let lines: Vec<StatementLine> = paid
            .iter()
            .map(|record| StatementLine {
                description: format!(
                    "حصة {} - الطالب {}",
                    linked_name(&record.class),
                    linked_name(&record.student)
                ),
                amount: record.amount,
            })
            .collect();
        let total = lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.amount));
        Some(Self {
            number: format!("TCH-{}-{}-{}", teacher_id, month, stamp),
            teacher: linked_name(&first.teacher),
            month: month.to_string(),
            lines,
            total,
        })
    }

    pub fn title(&self) -> String {
        format!("مستحقات الحصص لشهر {}", self.month)
    }
}

/// The part of `GET /classes/:id` the class payment dialog reads. The
/// teacher comes populated or as a bare id.
#[derive(Debug, Default, Deserialize)]
pub struct ClassDetails {
    #[serde(default)]
    teacher: Option<serde_json::Value>,
}

impl ClassDetails {
    /// The assigned teacher's share, or the house default when the class
    /// has none on record.
    pub fn teacher_percentage(&self) -> Decimal {
        self.teacher
            .as_ref()
            .and_then(|teacher| teacher.get("salaryPercentage"))
            .and_then(|pct| serde_json::from_value::<Decimal>(pct.clone()).ok())
            .filter(|pct| *pct > Decimal::ZERO && *pct <= Decimal::ONE_HUNDRED)
            .unwrap_or_else(|| Decimal::from(DEFAULT_CLASS_PERCENTAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        teacher: &str,
        class: &str,
        month: &str,
        amount: i64,
        status: Status,
    ) -> TeacherCommission {
        serde_json::from_value::<TeacherCommission>(serde_json::json!({
            "_id": id,
            "teacher": { "_id": teacher, "name": format!("T-{}", teacher) },
            "class": { "_id": class, "name": format!("C-{}", class) },
            "student": { "_id": format!("s-{}", id), "name": format!("S-{}", id) },
            "month": month,
            "amount": amount,
            "percentage": 70,
        }))
        .map(|mut r| {
            r.status = status;
            r
        })
        .unwrap()
    }

    fn sample() -> Vec<TeacherCommission> {
        vec![
            record("1", "t1", "math", "2024-01", 1000, Status::Pending),
            record("2", "t2", "phys", "2024-01", 700, Status::Paid),
            record("3", "t1", "math", "2024-02", 500, Status::Paid),
            record("4", "t1", "chem", "2024-01", 300, Status::Pending),
            record("5", "t2", "phys", "2024-02", 200, Status::Pending),
            record("6", "t1", "math", "2024-01", 50, Status::Other),
        ]
    }

    fn sum_where(
        records: &[TeacherCommission],
        pred: impl Fn(&TeacherCommission) -> bool,
    ) -> Decimal {
        records
            .iter()
            .filter(|r| pred(r) && matches!(r.status, Status::Pending | Status::Paid))
            .map(|r| r.amount)
            .sum()
    }

    #[test]
    fn teacher_class_groups_match_filtered_sums() {
        let records = sample();
        let groups = group_commissions(&records, GroupKey::ByTeacherClass);

        assert_eq!(groups.len(), 3);
        for group in &groups {
            let teacher = linked_id(&group.teacher).to_string();
            let class = linked_id(&group.class).to_string();
            let expected = sum_where(&records, |r| {
                linked_id(&r.teacher) == teacher && linked_id(&r.class) == class
            });
            assert_eq!(group.totals.total, expected, "group {}", group.title());
        }
    }

    #[test]
    fn pending_plus_paid_is_total_for_every_key() {
        let records = sample();
        for key in GroupKey::ALL {
            let groups = group_commissions(&records, key);
            for group in &groups {
                assert_eq!(group.totals.pending + group.totals.paid, group.totals.total);
            }
            let grand: Decimal = groups.iter().map(|g| g.totals.total).sum();
            assert_eq!(grand, CommissionTotals::of(&records).total);
        }
    }

    #[test]
    fn empty_input_has_zero_totals() {
        assert!(group_commissions(&[], GroupKey::ByTeacher).is_empty());
        let totals = CommissionTotals::of(&[]);
        assert_eq!(totals, CommissionTotals::default());
        assert_eq!(totals.pending + totals.paid, totals.total);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let groups = group_commissions(&sample(), GroupKey::ByTeacher);
        let titles: Vec<_> = groups.iter().map(CommissionGroup::title).collect();
        assert_eq!(titles, vec!["T-t1", "T-t2"]);
        let ids: Vec<_> = groups[0].records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4", "6"]);
    }

    #[test]
    fn teacher_month_groups_and_pending_ids() {
        let groups = group_commissions(&sample(), GroupKey::ByTeacherMonth);
        let first = &groups[0];
        assert_eq!(first.title(), "T-t1 - 2024-01");
        assert_eq!(first.common_month(), Some("2024-01"));
        assert_eq!(first.pending_ids(), vec!["1", "4"]);
        assert_eq!(first.totals.pending, Decimal::from(1300));
        assert_eq!(first.totals.paid, Decimal::ZERO);
    }

    #[test]
    fn class_group_title_and_month() {
        let groups = group_commissions(&sample(), GroupKey::ByTeacherClass);
        assert_eq!(groups[0].title(), "T-t1 - C-math");
        assert_eq!(groups[0].common_month(), None);
        assert_eq!(groups[2].title(), "T-t1 - C-chem");
        assert_eq!(groups[2].common_month(), Some("2024-01"));
    }

    #[test]
    fn group_key_round_trips_through_select_values() {
        for key in GroupKey::ALL {
            assert_eq!(GroupKey::from_value(key.value()), key);
        }
        assert_eq!(GroupKey::from_value("bogus"), GroupKey::ByTeacherClass);
    }

    #[test]
    fn class_commission_is_a_percentage_of_collected() {
        assert_eq!(
            class_commission_amount(Decimal::from(1300), Decimal::from(DEFAULT_CLASS_PERCENTAGE)),
            Some(Decimal::from(910))
        );
        assert_eq!(
            class_commission_amount(Decimal::from(334), Decimal::new(125, 1)),
            Some(Decimal::new(4175, 2))
        );
        assert_eq!(class_commission_amount(Decimal::MAX, Decimal::ONE_HUNDRED), None);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let mut records = sample();
        records[0].amount = Decimal::MAX;
        records[3].amount = Decimal::MAX;
        records[1].amount = Decimal::MAX;

        let totals = CommissionTotals::of(&records);
        assert_eq!(totals.pending, Decimal::MAX);
        assert_eq!(totals.paid, Decimal::MAX);
        assert_eq!(totals.total, Decimal::MAX);

        let groups = group_commissions(&records, GroupKey::ByTeacherMonth);
        assert_eq!(groups[0].totals.pending, Decimal::MAX);
    }

    #[test]
    fn statement_lists_every_paid_record() {
        let paid: Vec<_> = sample()
            .into_iter()
            .filter(|r| linked_id(&r.teacher) == "t2")
            .collect();
        let statement = CommissionStatement::from_paid("t2", "2024-01", &paid, 1700000000000).unwrap();

        assert_eq!(statement.number, "TCH-t2-2024-01-1700000000000");
        assert_eq!(statement.teacher, "T-t2");
        assert_eq!(statement.title(), "مستحقات الحصص لشهر 2024-01");
        assert_eq!(statement.lines.len(), 2);
        assert_eq!(statement.lines[0].description, "حصة C-phys - الطالب S-2");
        assert_eq!(statement.total, Decimal::from(900));

        assert_eq!(CommissionStatement::from_paid("t2", "2024-01", &[], 0), None);
    }

    #[test]
    fn class_percentage_comes_from_the_assigned_teacher() {
        let populated: ClassDetails = serde_json::from_value(serde_json::json!({
            "_id": "math",
            "teacher": { "_id": "t1", "name": "سمير", "salaryPercentage": 60 }
        }))
        .unwrap();
        assert_eq!(populated.teacher_percentage(), Decimal::from(60));

        let bare: ClassDetails =
            serde_json::from_value(serde_json::json!({ "teacher": "t1" })).unwrap();
        assert_eq!(bare.teacher_percentage(), Decimal::from(DEFAULT_CLASS_PERCENTAGE));

        let unset: ClassDetails = serde_json::from_value(serde_json::json!({
            "teacher": { "_id": "t1" }
        }))
        .unwrap();
        assert_eq!(unset.teacher_percentage(), Decimal::from(DEFAULT_CLASS_PERCENTAGE));
        assert_eq!(
            ClassDetails::default().teacher_percentage(),
            Decimal::from(DEFAULT_CLASS_PERCENTAGE)
        );
    }

    #[test]
    fn salary_body_uses_camel_case() {
        let body = serde_json::to_value(SalaryPayment {
            month: "2024-01".to_string(),
            payment_method: "cash".to_string(),
            payment_date: "2024-02-01".to_string(),
        })
        .unwrap();
        assert_eq!(body["month"], "2024-01");
        assert_eq!(body["paymentMethod"], "cash");
        assert_eq!(body["paymentDate"], "2024-02-01");
    }

    #[test]
    fn pay_bodies_use_camel_case() {
        let body = serde_json::to_value(CommissionPayment {
            commission_id: "c1".to_string(),
            payment_method: "cash".to_string(),
            payment_date: "2024-03-01".to_string(),
        })
        .unwrap();
        assert_eq!(body["commissionId"], "c1");
        assert_eq!(body["paymentMethod"], "cash");
        assert_eq!(body["paymentDate"], "2024-03-01");
    }
}
