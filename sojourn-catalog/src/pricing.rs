use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed service surcharge applied to every booking, uniform across hotels.
pub const SURCHARGE_PERCENT: i64 = 10;

/// Price breakdown for a stay. Recomputed from its inputs every time; there
/// is no cached state to fall out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub nights: u32,
    pub price_per_night_cents: i64,
    pub subtotal_cents: i64,
    pub total_cents: i64,
}

/// Whole nights between check-in and check-out, clamped to zero for equal or
/// inverted ranges.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    days.max(0) as u32
}

pub fn quote(price_per_night_cents: i64, check_in: NaiveDate, check_out: NaiveDate) -> Quote {
    let nights = nights_between(check_in, check_out);
    let subtotal_cents = price_per_night_cents * i64::from(nights);
    Quote {
        nights,
        price_per_night_cents,
        subtotal_cents,
        total_cents: with_surcharge(subtotal_cents),
    }
}

/// Zero quote when either date is still unselected.
pub fn quote_opt(
    price_per_night_cents: i64,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
) -> Quote {
    match (check_in, check_out) {
        (Some(ci), Some(co)) => quote(price_per_night_cents, ci, co),
        _ => Quote {
            nights: 0,
            price_per_night_cents,
            subtotal_cents: 0,
            total_cents: 0,
        },
    }
}

// Integer cents, round half up.
fn with_surcharge(subtotal_cents: i64) -> i64 {
    subtotal_cents + (subtotal_cents * SURCHARGE_PERCENT + 50) / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn three_nights_at_150_totals_495() {
        let q = quote(15000, d("2024-06-01"), d("2024-06-04"));
        assert_eq!(q.nights, 3);
        assert_eq!(q.subtotal_cents, 45000);
        assert_eq!(q.total_cents, 49500);
    }

    #[test]
    fn hundred_per_night_three_nights_totals_330() {
        let q = quote(10000, d("2024-06-01"), d("2024-06-04"));
        assert_eq!(q.total_cents, 33000);
    }

    #[test]
    fn equal_or_inverted_dates_are_zero_nights() {
        assert_eq!(quote(15000, d("2024-06-01"), d("2024-06-01")).total_cents, 0);
        assert_eq!(quote(15000, d("2024-06-04"), d("2024-06-01")).nights, 0);
    }

    #[test]
    fn missing_dates_quote_zero() {
        let q = quote_opt(15000, Some(d("2024-06-01")), None);
        assert_eq!(q.nights, 0);
        assert_eq!(q.total_cents, 0);
    }

    #[test]
    fn valid_ranges_are_at_least_one_night() {
        let q = quote(9999, d("2024-06-01"), d("2024-06-02"));
        assert_eq!(q.nights, 1);
        // 9999 * 1.1 = 10998.9, rounds half up.
        assert_eq!(q.total_cents, 10999);
    }
}
