use std::rc::Rc;

use chrono::{Datelike, Local, NaiveDate};
use yew::Reducible;

pub const ARABIC_MONTHS: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر",
    "أكتوبر", "نوفمبر", "ديسمبر",
];

/// Query parameters taken from the visible filter controls. Blank filters are
/// dropped so the server sees only what the user actually chose.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.0.push((key, value.to_string()));
        }
        self
    }

    pub fn with_page(self, pager: &Pager) -> Self {
        self.with("page", pager.page.to_string())
            .with("limit", pager.per_page.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl Pager {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            total_pages: 1,
        }
    }

    /// `None` when already on the last page.
    pub fn next(self) -> Option<Self> {
        (self.page < self.total_pages).then(|| Self {
            page: self.page + 1,
            ..self
        })
    }

    pub fn prev(self) -> Option<Self> {
        (self.page > 1).then(|| Self {
            page: self.page - 1,
            ..self
        })
    }

    pub fn first(self) -> Self {
        Self { page: 1, ..self }
    }

    pub fn with_total(self, total_pages: Option<u32>) -> Self {
        match total_pages {
            Some(total) if total > 0 => Self {
                total_pages: total,
                ..self
            },
            _ => self,
        }
    }

    pub fn label(&self) -> String {
        format!("الصفحة {} من {}", self.page, self.total_pages)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerAction {
    First,
    Next,
    Prev,
    TotalPages(Option<u32>),
}

/// Actions apply to the pager as it is when they land, so a page count that
/// arrives after the user paged on leaves their page alone.
impl Reducible for Pager {
    type Action = PagerAction;

    fn reduce(self: Rc<Self>, action: PagerAction) -> Rc<Self> {
        let current = *self;
        let next = match action {
            PagerAction::First => current.first(),
            PagerAction::Next => current.next().unwrap_or(current),
            PagerAction::Prev => current.prev().unwrap_or(current),
            PagerAction::TotalPages(total) => current.with_total(total),
        };
        if next == current {
            self
        } else {
            Rc::new(next)
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `(value, label)` pairs: this year's months so far, then the whole of last
/// year.
pub fn month_options(today: NaiveDate) -> Vec<(String, String)> {
    let year = today.year();
    let current_month = today.month0() as usize;
    let this_year = (0..=current_month).map(move |m| (year, m));
    let last_year = (0..12).map(move |m| (year - 1, m));

    this_year
        .chain(last_year)
        .map(|(y, m)| {
            (
                format!("{}-{:02}", y, m + 1),
                format!("{} {}", ARABIC_MONTHS[m], y),
            )
        })
        .collect()
}

pub fn year_options(today: NaiveDate) -> Vec<i32> {
    let year = today.year();
    (year - 5..=year).rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let query = QueryParams::new()
            .with("status", "pending")
            .with("month", "")
            .with("class", "   ")
            .with("student", " Amine ");

        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(pairs, vec![("status", "pending"), ("student", "Amine")]);
        assert!(QueryParams::new().with("type", "").is_empty());
    }

    #[test]
    fn page_params_come_from_the_pager() {
        let pager = Pager::new(20).with_total(Some(3)).next().unwrap();
        let query = QueryParams::new().with_page(&pager).with("status", "paid");
        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("limit"), Some("20"));
        assert_eq!(query.get("status"), Some("paid"));
    }

    #[test]
    fn pager_stays_within_bounds() {
        let pager = Pager::new(10);
        assert_eq!(pager.prev(), None);
        assert_eq!(pager.next(), None);

        let pager = pager.with_total(Some(2));
        let last = pager.next().unwrap();
        assert_eq!(last.page, 2);
        assert_eq!(last.next(), None);
        assert_eq!(last.prev().unwrap().page, 1);
        assert_eq!(last.first().page, 1);
        assert_eq!(last.label(), "الصفحة 2 من 2");
    }

    #[test]
    fn missing_or_zero_total_keeps_previous_count() {
        let pager = Pager::new(20).with_total(Some(5));
        assert_eq!(pager.with_total(None).total_pages, 5);
        assert_eq!(pager.with_total(Some(0)).total_pages, 5);
    }

    #[test]
    fn late_page_count_keeps_the_current_page() {
        let pager = Rc::new(Pager::new(20)).reduce(PagerAction::TotalPages(Some(4)));
        let paged = pager.reduce(PagerAction::Next).reduce(PagerAction::Next);
        assert_eq!(paged.page, 3);

        let answered = paged.reduce(PagerAction::TotalPages(Some(5)));
        assert_eq!(answered.page, 3);
        assert_eq!(answered.total_pages, 5);

        let start = answered.reduce(PagerAction::First);
        assert_eq!(start.page, 1);
        let unchanged = start.clone().reduce(PagerAction::Prev);
        assert!(Rc::ptr_eq(&start, &unchanged));
    }

    #[test]
    fn month_options_cover_this_year_so_far_and_all_of_last_year() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let options = month_options(today);

        assert_eq!(options.len(), 3 + 12);
        assert_eq!(options[0], ("2024-01".to_string(), "يناير 2024".to_string()));
        assert_eq!(options[2].0, "2024-03");
        assert_eq!(options[3].0, "2023-01");
        assert_eq!(options[14], ("2023-12".to_string(), "ديسمبر 2023".to_string()));
    }

    #[test]
    fn year_options_run_back_five_years() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(year_options(today), vec![2024, 2023, 2022, 2021, 2020, 2019]);
    }

    #[test]
    fn iso_date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        assert_eq!(iso_date(date), "2024-02-05");
    }
}
