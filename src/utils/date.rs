//! Calendar date helpers for publish dates.
//!
//! Index sheets store publish dates as spreadsheet serial numbers. A
//! serial counts days from 1900-01-01 (serial 1) and is rendered in the
//! short `Www Mmm DD YYYY` form used on listing cards.
//!
//! ```ignore
//! assert_eq!(convert_excel_date(1.0), Some("Mon Jan 01 1900".into()));
//! ```

/// Calendar date without time or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Latest serial we accept (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

impl Date {
    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Advance by whole days.
    pub fn add_days(self, mut days: u32) -> Self {
        let Self {
            mut year,
            mut month,
            mut day,
        } = self;

        while days > 0 {
            let year_len: u32 = if Self::is_leap_year(year) { 366 } else { 365 };
            // Jump whole years while sitting on Jan 1st
            if month == 1 && day == 1 && days >= year_len {
                days -= year_len;
                year += 1;
                continue;
            }

            let left_in_month = u32::from(Self::days_in_month(year, month) - day) + 1;
            if days >= left_in_month {
                days -= left_in_month;
                day = 1;
                if month == 12 {
                    month = 1;
                    year += 1;
                } else {
                    month += 1;
                }
            } else {
                day += days as u8;
                days = 0;
            }
        }

        Self { year, month, day }
    }

    /// Date for a spreadsheet serial, where serial 1 is 1900-01-01.
    ///
    /// Fractional parts (time of day) are dropped.
    pub fn from_excel_serial(serial: f64) -> Option<Self> {
        if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = serial.trunc() as u32 - 1;
        Some(Self::from_ymd(1900, 1, 1).add_days(offset))
    }

    /// Format as `Www Mmm DD YYYY`, e.g. `Thu Mar 16 2023`.
    pub fn to_date_string(self) -> String {
        const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        format!(
            "{} {} {:02} {:04}",
            WEEKDAYS[self.weekday_index()],
            MONTHS[(self.month - 1) as usize],
            self.day,
            self.year
        )
    }

    /// Zeller's congruence (0 = Saturday).
    #[inline]
    #[allow(clippy::cast_sign_loss)] // Result of % 7 is always 0-6
    fn weekday_index(self) -> usize {
        let (y, m) = if self.month < 3 {
            (i32::from(self.year) - 1, i32::from(self.month) + 12)
        } else {
            (i32::from(self.year), i32::from(self.month))
        };
        let d = i32::from(self.day);
        ((d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize
    }
}

/// Render a spreadsheet serial as a readable date string.
pub fn convert_excel_date(serial: f64) -> Option<String> {
    Date::from_excel_serial(serial).map(Date::to_date_string)
}
