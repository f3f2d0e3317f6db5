pub mod batch;
pub mod error;
pub mod watch;

pub use batch::ChangeBatch;
pub use error::WatchError;
pub use watch::{FileWatcher, DEFAULT_DEBOUNCE};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn detects_a_file_write_as_one_coalesced_batch() {
        let dir = tempfile::tempdir().unwrap();
        let (watcher, mut rx) = FileWatcher::start(dir.path(), Duration::from_millis(50)).unwrap();

        let file_path = dir.path().join("a.txt");
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(&file_path, b"hello").unwrap();

        let batch = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert!(batch.changed.iter().any(|p| p.ends_with("a.txt")));

        watcher.stop().await;
    }
}
