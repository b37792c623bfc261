//! RFC 7231 `Date` header values, cached per thread.
//!
//! Every response carries a `Date` header and formatting one is far more
//! expensive than reading the clock, so the rendered string is reused
//! until the wall clock ticks over to the next second.

use std::cell::RefCell;

use chrono::Utc;

const FMT: &str = "%a, %d %b %Y %H:%M:%S GMT";

thread_local! {
    static CACHE: RefCell<(i64, String)> = const { RefCell::new((i64::MIN, String::new())) };
}

/// The current time rendered as an IMF-fixdate, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn now() -> String {
    let now = Utc::now();
    let secs = now.timestamp();
    CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.0 != secs {
            cache.1 = now.format(FMT).to_string();
            cache.0 = secs;
        }
        cache.1.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape() {
        let date = now();
        // e.g. "Sun, 06 Nov 1994 08:49:37 GMT"
        assert_eq!(date.len(), 29);
        assert!(date.ends_with(" GMT"));
        assert_eq!(&date[3..5], ", ");
    }

    #[test]
    fn cached_within_a_second() {
        let a = now();
        let b = now();
        assert_eq!(a, b);
    }
}
