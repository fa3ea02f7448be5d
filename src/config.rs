//! Environment-driven configuration.
//!
//! All knobs are plain environment variables read once at startup. Parsing
//! is kept in pure helpers so defaults and clamping are testable.

use std::num::NonZeroUsize;

use once_cell::sync::Lazy;

/// Default number of viewer pages kept alive, a small multiple of the
/// visible paging window.
pub const DEFAULT_PAGE_CACHE: usize = 5;

/// Default longest-side cap for background decodes.
pub const DEFAULT_DECODE_MAX: u32 = 2048;

/// Default number of decode worker threads.
pub const DEFAULT_DECODE_WORKERS: usize = 2;

/// Maximum number of decode worker threads.
const MAX_DECODE_WORKERS: usize = 4;

/// Capacity of the per-item page cache (`PICTOR_PAGE_CACHE`).
pub static PAGE_CACHE_CAPACITY: Lazy<NonZeroUsize> =
    Lazy::new(|| page_cache_capacity_from(std::env::var("PICTOR_PAGE_CACHE").ok().as_deref()));

/// Longest-side cap for decoded photos (`PICTOR_DECODE_MAX`).
pub static DECODE_MAX_SIZE: Lazy<u32> =
    Lazy::new(|| decode_max_from(std::env::var("PICTOR_DECODE_MAX").ok().as_deref()));

/// Number of decode worker threads (`PICTOR_DECODE_WORKERS`).
pub static DECODE_WORKERS: Lazy<usize> =
    Lazy::new(|| decode_workers_from(std::env::var("PICTOR_DECODE_WORKERS").ok().as_deref()));

fn page_cache_capacity_from(raw: Option<&str>) -> NonZeroUsize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .and_then(NonZeroUsize::new)
        .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_PAGE_CACHE).unwrap())
}

fn decode_max_from(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .map(|v| v.clamp(512, 8192))
        .unwrap_or(DEFAULT_DECODE_MAX)
}

fn decode_workers_from(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .map(|v| v.min(MAX_DECODE_WORKERS))
        .unwrap_or(DEFAULT_DECODE_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_cache_defaults_and_parses() {
        assert_eq!(page_cache_capacity_from(None).get(), DEFAULT_PAGE_CACHE);
        assert_eq!(page_cache_capacity_from(Some("8")).get(), 8);
        assert_eq!(page_cache_capacity_from(Some(" 3 ")).get(), 3);
    }

    #[test]
    fn page_cache_rejects_zero_and_garbage() {
        assert_eq!(page_cache_capacity_from(Some("0")).get(), DEFAULT_PAGE_CACHE);
        assert_eq!(
            page_cache_capacity_from(Some("many")).get(),
            DEFAULT_PAGE_CACHE
        );
    }

    #[test]
    fn decode_max_is_clamped() {
        assert_eq!(decode_max_from(None), DEFAULT_DECODE_MAX);
        assert_eq!(decode_max_from(Some("100")), 512);
        assert_eq!(decode_max_from(Some("99999")), 8192);
        assert_eq!(decode_max_from(Some("4096")), 4096);
    }

    #[test]
    fn worker_count_is_bounded() {
        assert_eq!(decode_workers_from(None), DEFAULT_DECODE_WORKERS);
        assert_eq!(decode_workers_from(Some("1")), 1);
        assert_eq!(decode_workers_from(Some("16")), MAX_DECODE_WORKERS);
        assert_eq!(decode_workers_from(Some("0")), DEFAULT_DECODE_WORKERS);
    }
}
