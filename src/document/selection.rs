use crate::drawing::ObjectId;

/// Ids of the selected objects, in the order they were selected.
///
/// The document keeps each object's own selected flag in step with this set;
/// the set itself only tracks membership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<ObjectId>,
}

impl SelectionSet {
    /// Returns false if the id was already selected
    pub fn insert(&mut self, id: ObjectId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns false if the id was not selected
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&selected| selected != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    /// Empty the set, returning what was selected
    pub fn take(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.ids)
    }

    pub fn first(&self) -> Option<ObjectId> {
        self.ids.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut selection = SelectionSet::default();
        let id = ObjectId::from_u128(1);
        assert!(selection.insert(id));
        assert!(!selection.insert(id));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_keeps_selection_order() {
        let mut selection = SelectionSet::default();
        let (a, b, c) = (
            ObjectId::from_u128(3),
            ObjectId::from_u128(1),
            ObjectId::from_u128(2),
        );
        selection.insert(a);
        selection.insert(b);
        selection.insert(c);
        assert_eq!(selection.first(), Some(a));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![a, b, c]);

        assert!(selection.remove(a));
        assert!(!selection.remove(a));
        assert_eq!(selection.first(), Some(b));
    }

    #[test]
    fn test_take_empties() {
        let mut selection = SelectionSet::default();
        selection.insert(ObjectId::from_u128(5));
        let taken = selection.take();
        assert_eq!(taken.len(), 1);
        assert!(selection.is_empty());
        assert_eq!(selection.first(), None);
    }
}
