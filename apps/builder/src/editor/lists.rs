//! Copy-on-write list operations shared by every repeatable collection.
//!
//! Each function returns a new vector and leaves its input untouched. Removal
//! never empties a list.

use crate::models::resume::Identified;

pub fn append<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    if items.len() <= 1 || index >= items.len() {
        return items.to_vec();
    }
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

pub fn update_at<T: Clone>(items: &[T], index: usize, f: impl FnOnce(&mut T)) -> Vec<T> {
    let mut next = items.to_vec();
    if let Some(item) = next.get_mut(index) {
        f(item);
    }
    next
}

pub fn remove_by_id<T: Clone + Identified>(items: &[T], id: &str) -> Vec<T> {
    match items.iter().position(|item| item.id() == id) {
        Some(index) => remove_at(items, index),
        None => items.to_vec(),
    }
}

pub fn update_by_id<T: Clone + Identified>(items: &[T], id: &str, f: impl FnOnce(&mut T)) -> Vec<T> {
    match items.iter().position(|item| item.id() == id) {
        Some(index) => update_at(items, index, f),
        None => items.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Project;

    fn project(id: &str, title: &str) -> Project {
        Project {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_append_preserves_existing() {
        let items = vec!["a".to_string(), "b".to_string()];
        let next = append(&items, "c".to_string());
        assert_eq!(next, vec!["a", "b", "c"]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_remove_last_remaining_is_noop() {
        let items = vec!["only".to_string()];
        assert_eq!(remove_at(&items, 0), items);
        let records = vec![project("p1", "Only")];
        assert_eq!(remove_by_id(&records, "p1"), records);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(remove_at(&items, 5), items);
    }

    #[test]
    fn test_remove_by_id_keeps_order() {
        let records = vec![project("p1", "A"), project("p2", "B"), project("p3", "C")];
        let next = remove_by_id(&records, "p2");
        let ids: Vec<_> = next.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let records = vec![project("p1", "A")];
        let next = update_by_id(&records, "missing", |p| p.title = "changed".into());
        assert_eq!(next, records);
    }
}
