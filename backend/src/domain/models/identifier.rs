use chrono::Utc;
use shared::Item;
use uuid::Uuid;

const SUFFIX_LEN: usize = 10;

/// Generate a fresh record identifier.
///
/// Format: base-36 creation millis followed by a random lowercase suffix.
/// `is_taken` is consulted so the result is unique within the collection.
pub fn generate_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let now_millis = Utc::now().timestamp_millis().max(0) as u64;
        let suffix = Uuid::new_v4().simple().to_string();
        let id = Item::generate_id(now_millis, &suffix[..SUFFIX_LEN]);
        if !is_taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..200).map(|_| generate_id(|_| false)).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_retries_taken_ids() {
        let calls = Cell::new(0);
        let id = generate_id(|_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });

        assert_eq!(calls.get(), 3);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
