//! Notification message store.
//!
//! Messages about recorded changes are appended to `messages.jsonl` in
//! the app's data directory and read back by kind for display; `clear`
//! drains a kind after it has been shown.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};

use crate::models::Notification;
use crate::storage::Storage;
use crate::Result;

/// Append a notification to the store.
pub fn append(storage: &Storage, message: &Notification) -> Result<()> {
    let json = serde_json::to_string(message)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(storage.messages_path())?;
    writeln!(file, "{}", json)?;
    Ok(())
}

/// List messages, oldest first. `kind` filters when set.
pub fn list(storage: &Storage, kind: Option<&str>) -> Result<Vec<Notification>> {
    let path = storage.messages_path();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut messages = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let message: Notification = serde_json::from_str(&line)?;
        if kind.is_none_or(|k| message.kind == k) {
            messages.push(message);
        }
    }
    Ok(messages)
}

/// Remove messages of a kind (or all messages when `kind` is None).
///
/// Returns the number of messages removed.
pub fn clear(storage: &Storage, kind: Option<&str>) -> Result<usize> {
    let before = list(storage, None)?;
    let kept: Vec<&Notification> = before
        .iter()
        .filter(|m| kind.is_some_and(|k| m.kind != k))
        .collect();
    let removed = before.len() - kept.len();

    let mut out = String::new();
    for message in &kept {
        out.push_str(&serde_json::to_string(message)?);
        out.push('\n');
    }
    std::fs::write(storage.messages_path(), out)?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChangeRecord, Notification, MIGRATION_MESSAGE_KIND};
    use crate::test_utils::TestEnv;

    fn message(path: &str) -> Notification {
        Notification::logged(
            ChangeRecord::new(path, "1"),
            format!("$installer->setConfigData('{}', '1', 'default', '0');", path),
        )
    }

    #[test]
    fn test_list_empty_store() {
        let env = TestEnv::new();
        let storage = env.init_storage();
        assert!(list(&storage, None).unwrap().is_empty());
    }

    #[test]
    fn test_append_then_list_by_kind() {
        let env = TestEnv::new();
        let storage = env.init_storage();

        append(&storage, &message("a/b/c")).unwrap();
        append(&storage, &message("d/e/f")).unwrap();

        let all = list(&storage, Some(MIGRATION_MESSAGE_KIND)).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].change.path, "a/b/c");

        assert!(list(&storage, Some("other")).unwrap().is_empty());
    }

    #[test]
    fn test_clear_by_kind() {
        let env = TestEnv::new();
        let storage = env.init_storage();

        append(&storage, &message("a/b/c")).unwrap();
        append(&storage, &message("d/e/f")).unwrap();

        let removed = clear(&storage, Some(MIGRATION_MESSAGE_KIND)).unwrap();
        assert_eq!(removed, 2);
        assert!(list(&storage, None).unwrap().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let env = TestEnv::new();
        let storage = env.init_storage();

        append(&storage, &message("a/b/c")).unwrap();
        let removed = clear(&storage, None).unwrap();
        assert_eq!(removed, 1);
        assert!(list(&storage, None).unwrap().is_empty());
    }
}
