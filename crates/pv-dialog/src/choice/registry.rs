//! The set of choices offered in one presentation cycle.

use super::entry::ChoiceEntry;

/// Choices currently offered to the player, in display order once sorted.
///
/// The registry does not deduplicate; keeping consumed important topics out
/// is the conversation's job.
#[derive(Debug, Clone, Default)]
pub struct ChoiceRegistry {
    entries: Vec<ChoiceEntry>,
}

impl ChoiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every choice.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a choice.
    pub fn add(&mut self, entry: ChoiceEntry) {
        self.entries.push(entry);
    }

    /// Number of choices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no choice is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Choice at `index`.
    pub fn get(&self, index: usize) -> Option<&ChoiceEntry> {
        self.entries.get(index)
    }

    /// All choices, in display order once sorted.
    pub fn entries(&self) -> &[ChoiceEntry] {
        &self.entries
    }

    /// Iterate over the choices.
    pub fn iter(&self) -> impl Iterator<Item = &ChoiceEntry> {
        self.entries.iter()
    }

    /// A sort key below every held choice, so a choice added with it sorts
    /// first.
    ///
    /// Counts down from `baseline` when that is lower than every held key.
    /// Returns `None` once the lowest key is `i32::MIN`.
    pub fn before_front_order(&self, baseline: i32) -> Option<i32> {
        self.entries
            .iter()
            .map(|e| e.order)
            .fold(baseline, i32::min)
            .checked_sub(1)
    }

    /// Sort by ascending order. Choices with equal keys keep insertion order.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|e| e.order);
    }

    /// Index of the important choice to play first: lowest order, earliest
    /// inserted on ties.
    pub fn first_important(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.important)
            .min_by_key(|(i, e)| (e.order, *i))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use pv_core::{ScriptFn, TopicId};

    fn entry(seq: usize, order: i32) -> ChoiceEntry {
        ChoiceEntry::new(
            format!("choice {seq}"),
            ScriptFn::new(format!("FN_{seq:03}")),
            TopicId::new(format!("T{seq:03}")),
            order,
        )
    }

    #[test]
    fn add_and_clear() {
        let mut reg = ChoiceRegistry::new();
        reg.add(entry(0, 1));
        reg.add(entry(0, 1));
        assert_eq!(reg.len(), 2);

        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn front_order_of_empty_registry() {
        let reg = ChoiceRegistry::new();
        assert_eq!(reg.before_front_order(0), Some(-1));
        assert_eq!(reg.before_front_order(-5), Some(-6));
    }

    #[test]
    fn front_order_below_minimum() {
        let mut reg = ChoiceRegistry::new();
        reg.add(entry(0, 4));
        reg.add(entry(1, -3));
        assert_eq!(reg.before_front_order(0), Some(-4));
    }

    #[test]
    fn no_front_order_below_min_key() {
        let mut reg = ChoiceRegistry::new();
        reg.add(entry(0, i32::MIN));
        assert_eq!(reg.before_front_order(0), None);
        assert_eq!(ChoiceRegistry::new().before_front_order(i32::MIN), None);

        reg.clear();
        reg.add(entry(0, i32::MIN + 1));
        assert_eq!(reg.before_front_order(0), Some(i32::MIN));
    }

    #[test]
    fn first_important_prefers_lowest_order() {
        let mut reg = ChoiceRegistry::new();
        reg.add(entry(0, 0));
        reg.add(entry(1, 5).with_important(true));
        reg.add(entry(2, 2).with_important(true));
        reg.add(entry(3, 2).with_important(true));
        assert_eq!(reg.first_important(), Some(2));
    }

    #[test]
    fn no_important_choice() {
        let mut reg = ChoiceRegistry::new();
        reg.add(entry(0, 0));
        assert_eq!(reg.first_important(), None);
    }

    proptest! {
        #[test]
        fn sort_is_ordered_and_stable(orders in prop::collection::vec(-20i32..20, 0..40)) {
            let mut reg = ChoiceRegistry::new();
            for (seq, order) in orders.iter().enumerate() {
                reg.add(entry(seq, *order));
            }
            reg.sort();

            prop_assert_eq!(reg.len(), orders.len());
            for pair in reg.entries().windows(2) {
                prop_assert!(pair[0].order <= pair[1].order);
                if pair[0].order == pair[1].order {
                    prop_assert!(pair[0].topic < pair[1].topic);
                }
            }
        }

        #[test]
        fn front_insert_sorts_first(
            orders in prop::collection::vec(-1000i32..1000, 0..40),
            baseline in -10i32..10,
        ) {
            let mut reg = ChoiceRegistry::new();
            for (seq, order) in orders.iter().enumerate() {
                reg.add(entry(seq, *order));
            }

            let key = reg.before_front_order(baseline).unwrap();
            prop_assert!(reg.iter().all(|e| e.order > key));

            reg.add(entry(999, key));
            reg.sort();
            prop_assert_eq!(reg.get(0).map(|e| e.text.as_str()), Some("choice 999"));
        }
    }
}
