use std::collections::BTreeSet;

/// Payments ticked for bulk settlement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentSelection {
    ids: BTreeSet<String>,
}

impl PaymentSelection {
    pub fn toggle(mut self, id: &str, checked: bool) -> Self {
        if checked {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
        self
    }

    /// Select-all / deselect-all over the rows currently rendered.
    pub fn set_all<'a>(mut self, ids: impl IntoIterator<Item = &'a str>, checked: bool) -> Self {
        for id in ids {
            self = self.toggle(id, checked);
        }
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn covers<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn count_label(&self) -> String {
        format!("{} مدفوعات محددة", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 4] = ["p1", "p2", "p3", "p4"];

    #[test]
    fn select_then_deselect_is_a_no_op() {
        let before = PaymentSelection::default().toggle("p1", true);
        let after = before.clone().toggle("p2", true).toggle("p2", false);
        assert_eq!(after.len(), before.len());
        assert_eq!(after, before);
    }

    #[test]
    fn select_all_then_deselect_one() {
        let selection = PaymentSelection::default()
            .set_all(ROWS, true)
            .toggle("p3", false);

        assert_eq!(selection.len(), ROWS.len() - 1);
        assert!(!selection.contains("p3"));
        assert!(!selection.covers(ROWS));
    }

    #[test]
    fn double_check_counts_once() {
        let selection = PaymentSelection::default()
            .toggle("p1", true)
            .toggle("p1", true);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.count_label(), "1 مدفوعات محددة");
    }

    #[test]
    fn deselect_all_empties() {
        let selection = PaymentSelection::default()
            .set_all(ROWS, true)
            .set_all(ROWS, false);
        assert!(selection.is_empty());
        assert!(!selection.covers(std::iter::empty()));
    }

    #[test]
    fn covers_requires_every_row() {
        let selection = PaymentSelection::default().set_all(ROWS, true);
        assert!(selection.covers(ROWS));
        assert_eq!(selection.ids(), vec!["p1", "p2", "p3", "p4"]);
    }
}
