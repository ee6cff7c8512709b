use colored::*;
use oucount_common::aggregation::{CountFailure, LocatedCount, UNKNOWN_LOCATION};

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn located_to_details(located: &LocatedCount) -> Vec<Detail> {
    vec![
        ("Location".to_string(), location_value(&located.location)),
        ("Count".to_string(), count_value(located.count)),
    ]
}

pub fn failure_to_details(failure: &CountFailure) -> Vec<Detail> {
    vec![
        ("Count".to_string(), "failed".color(colors::FAILURE).bold()),
        ("Reason".to_string(), failure.reason.as_str().color(colors::FAILURE)),
    ]
}

pub fn location_value(location: &str) -> ColoredString {
    if location == UNKNOWN_LOCATION {
        location.dimmed().italic()
    } else {
        location.color(colors::LOCATION)
    }
}

pub fn count_value(count: u64) -> ColoredString {
    count.to_string().color(colors::COUNT).bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_carry_location_and_count() {
        let lc = LocatedCount {
            path: "OU=ADM,OU=Office1,DC=x".into(),
            location: "Office1".into(),
            count: 12,
        };
        let details = located_to_details(&lc);
        assert_eq!(details[0].0, "Location");
        assert_eq!(&*details[0].1, "Office1");
        assert_eq!(&*details[1].1, "12");
    }
}
