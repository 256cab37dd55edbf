use std::sync::{Arc, OnceLock};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

const MAX_SCAN_CONCURRENCY: usize = 32;

/// One slot below the processor count, so the scheduling thread keeps a
/// core while scan tasks churn through file contents.
fn default_scan_concurrency() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus.saturating_sub(1).max(1)
}

fn parse_scan_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_SCAN_CONCURRENCY)
}

fn scan_concurrency_from_env() -> usize {
    let raw = std::env::var("FINDREFS_SCAN_CONCURRENCY").ok();
    parse_scan_concurrency(raw.as_deref(), default_scan_concurrency())
}

fn semaphore() -> Arc<Semaphore> {
    static SEM: OnceLock<Arc<Semaphore>> = OnceLock::new();
    SEM.get_or_init(|| {
        let limit = scan_concurrency_from_env();
        log::debug!("scan concurrency limit: {limit}");
        Arc::new(Semaphore::new(limit))
    })
    .clone()
}

/// Blocks until a scan slot is free. The permit is released on drop,
/// whether the task succeeds or fails.
pub(crate) async fn acquire_scan_permit() -> OwnedSemaphorePermit {
    // The semaphore is never closed; acquire failures are not expected.
    semaphore()
        .acquire_owned()
        .await
        .unwrap_or_else(|_| unreachable!("scan concurrency semaphore closed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scan_concurrency_defaults_and_clamps() {
        let default_value = default_scan_concurrency();
        assert_eq!(parse_scan_concurrency(None, default_value), default_value);
        assert_eq!(
            parse_scan_concurrency(Some(""), default_value),
            default_value
        );
        assert_eq!(parse_scan_concurrency(Some("3"), default_value), 3);
        assert_eq!(parse_scan_concurrency(Some("0"), default_value), 1);
        assert_eq!(
            parse_scan_concurrency(Some("999"), default_value),
            MAX_SCAN_CONCURRENCY
        );
        assert_eq!(
            parse_scan_concurrency(Some("abc"), default_value),
            default_value
        );
        assert_eq!(parse_scan_concurrency(Some(" 7 "), default_value), 7);
    }

    #[test]
    fn default_is_at_least_one() {
        assert!(default_scan_concurrency() >= 1);
    }
}
