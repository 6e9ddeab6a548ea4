//! Tests for `LocalConnection`.

use std::fs;

use crate::collaborators::Connection;
use crate::local::{LocalConnection, WORK_DIR_PREFIX};

#[tokio::test]
async fn work_dirs_are_unique() {
  let target = tempfile::tempdir().unwrap();
  let conn = LocalConnection::new(target.path());
  let a = conn.make_work_dir().await.unwrap();
  let b = conn.make_work_dir().await.unwrap();
  assert_ne!(a, b);
  assert!(a.is_dir());
  assert!(a.starts_with(target.path()));
  let name = a.file_name().unwrap().to_string_lossy().into_owned();
  assert!(name.starts_with(WORK_DIR_PREFIX));
}

#[tokio::test]
async fn remove_work_dirs_deletes_only_allocated_dirs() {
  let target = tempfile::tempdir().unwrap();
  let conn = LocalConnection::new(target.path());
  let supplied = target.path().join("work");
  fs::create_dir_all(&supplied).unwrap();
  let allocated = conn.make_work_dir().await.unwrap();
  fs::create_dir_all(allocated.join("utils")).unwrap();
  fs::write(allocated.join("utils").join("__init__.py"), "").unwrap();

  let removed = conn.remove_work_dirs().await.unwrap();

  assert_eq!(removed, 1);
  assert!(!allocated.exists());
  assert!(supplied.is_dir());
  assert!(conn.allocated_work_dirs().is_empty());
}

#[tokio::test]
async fn clones_share_allocations() {
  let target = tempfile::tempdir().unwrap();
  let conn = LocalConnection::new(target.path());
  let handle = conn.clone();
  handle.make_work_dir().await.unwrap();

  assert_eq!(conn.allocated_work_dirs().len(), 1);
  assert_eq!(conn.remove_work_dirs().await.unwrap(), 1);
  assert_eq!(fs::read_dir(target.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn already_removed_dirs_are_ignored() {
  let target = tempfile::tempdir().unwrap();
  let conn = LocalConnection::new(target.path());
  let dir = conn.make_work_dir().await.unwrap();
  fs::remove_dir_all(&dir).unwrap();

  assert_eq!(conn.remove_work_dirs().await.unwrap(), 0);
}
