//! Academic calendar: two terms a year, fall starting in August.

use chrono::{Datelike, Local, NaiveDate};

/// Zero-indexed month that opens the fall half of the year.
const FALL_START_MONTH0: u32 = 7;

/// Index of the term the student is in today.
pub fn current_term(date_joined: NaiveDate, starting_semester: i32) -> i32 {
    current_term_on(Local::now().date_naive(), date_joined, starting_semester)
}

/// Same as [`current_term`] but evaluated on `today`.
pub fn current_term_on(today: NaiveDate, date_joined: NaiveDate, starting_semester: i32) -> i32 {
    let start = term_start(date_joined);
    let end = term_start(today);

    // 入學日在未來時視為剛入學
    let months = months_between(start, end).max(0);
    let years = months / 12;
    let remainder = months % 12;

    starting_semester + 2 * years + i32::from(remainder != 0)
}

pub fn current_year(term: i32) -> i32 {
    (term + 1).div_euclid(2)
}

fn term_start(date: NaiveDate) -> (i32, u32) {
    let month0 = if date.month0() >= FALL_START_MONTH0 {
        FALL_START_MONTH0
    } else {
        0
    };
    (date.year(), month0)
}

fn months_between(start: (i32, u32), end: (i32, u32)) -> i32 {
    (end.0 - start.0) * 12 + end.1 as i32 - start.1 as i32
}
