use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Display marker for one calendar day of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMarker {
    RangeStart,
    RangeEnd,
    InRange,
}

/// Accumulates a check-in/check-out pair from sequential day taps.
///
/// Empty -> first tap sets check-in. Second tap closes the range, swapping
/// the endpoints when it lands before check-in. A third tap starts over with
/// the tapped day as the new check-in; no explicit clear action exists.
/// Tapping the check-in day again yields a zero-night range, which is left
/// for the submission layer to reject.
#[derive(Debug, Default)]
pub struct RangeSelector {
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    markers: BTreeMap<NaiveDate, DayMarker>,
}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tap(&mut self, day: NaiveDate) {
        match (self.check_in, self.check_out) {
            (None, _) | (Some(_), Some(_)) => {
                self.check_in = Some(day);
                self.check_out = None;
            }
            (Some(check_in), None) => {
                if day < check_in {
                    self.check_in = Some(day);
                    self.check_out = Some(check_in);
                } else {
                    self.check_out = Some(day);
                }
            }
        }
        self.remark();
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    /// Both endpoints, once the second tap has landed.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.check_in?, self.check_out?))
    }

    pub fn markers(&self) -> &BTreeMap<NaiveDate, DayMarker> {
        &self.markers
    }

    fn remark(&mut self) {
        self.markers.clear();
        let Some(start) = self.check_in else {
            return;
        };
        let end = self.check_out.unwrap_or(start);

        let mut day = start;
        while day <= end {
            let marker = if day == start {
                DayMarker::RangeStart
            } else if day == end {
                DayMarker::RangeEnd
            } else {
                DayMarker::InRange
            };
            self.markers.insert(day, marker);
            if let Some(next) = day.succ_opt() {
                day = next;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn two_taps_in_order_form_a_range() {
        let mut sel = RangeSelector::new();
        sel.tap(d("2024-06-01"));
        assert_eq!(sel.check_in(), Some(d("2024-06-01")));
        assert_eq!(sel.check_out(), None);

        sel.tap(d("2024-06-04"));
        assert_eq!(sel.range(), Some((d("2024-06-01"), d("2024-06-04"))));
    }

    #[test]
    fn earlier_second_tap_swaps_endpoints() {
        let mut sel = RangeSelector::new();
        sel.tap(d("2024-06-04"));
        sel.tap(d("2024-06-01"));
        assert_eq!(sel.range(), Some((d("2024-06-01"), d("2024-06-04"))));
    }

    #[test]
    fn third_tap_starts_a_fresh_selection() {
        let mut sel = RangeSelector::new();
        sel.tap(d("2024-06-01"));
        sel.tap(d("2024-06-04"));
        sel.tap(d("2024-06-10"));
        assert_eq!(sel.check_in(), Some(d("2024-06-10")));
        assert_eq!(sel.check_out(), None);
        assert_eq!(sel.range(), None);
    }

    #[test]
    fn tapping_check_in_again_gives_a_zero_night_range() {
        let mut sel = RangeSelector::new();
        sel.tap(d("2024-06-01"));
        sel.tap(d("2024-06-01"));
        assert_eq!(sel.range(), Some((d("2024-06-01"), d("2024-06-01"))));
    }

    #[test]
    fn markers_cover_the_selection() {
        let mut sel = RangeSelector::new();
        sel.tap(d("2024-06-01"));
        assert_eq!(sel.markers()[&d("2024-06-01")], DayMarker::RangeStart);

        sel.tap(d("2024-06-04"));
        let markers = sel.markers();
        assert_eq!(markers.len(), 4);
        assert_eq!(markers[&d("2024-06-01")], DayMarker::RangeStart);
        assert_eq!(markers[&d("2024-06-02")], DayMarker::InRange);
        assert_eq!(markers[&d("2024-06-03")], DayMarker::InRange);
        assert_eq!(markers[&d("2024-06-04")], DayMarker::RangeEnd);
    }
}
