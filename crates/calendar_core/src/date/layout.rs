//! Month grid geometry.

use super::{date_key, days_in_month, first_day_of_month, month_name};

/// One day cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCell {
    /// Day of month, 1-based.
    pub day: u32,
    /// Canonical `YYYY-MM-DD` key of this day.
    pub date: String,
}

/// Geometry of a month rendered as a 7-column grid starting on Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLayout {
    pub year: i32,
    /// Zero-based month.
    pub month: u32,
    /// Blank cells before day 1.
    pub leading_blanks: u32,
    pub cells: Vec<MonthCell>,
}

impl MonthLayout {
    /// Computes the layout for a zero-based month, `None` when out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let leading_blanks = first_day_of_month(year, month)?;
        let day_count = days_in_month(year, month)?;
        let cells = (1..=day_count)
            .map(|day| date_key(year, month, day).map(|date| MonthCell { day, date }))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            year,
            month,
            leading_blanks,
            cells,
        })
    }

    /// Title such as `March 2024`.
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month).unwrap_or("?"), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::MonthLayout;

    #[test]
    fn layout_for_february_leap_year() {
        let layout = MonthLayout::new(2024, 1).expect("valid month");
        assert_eq!(layout.leading_blanks, 4);
        assert_eq!(layout.cells.len(), 29);
        assert_eq!(layout.cells[0].date, "2024-02-01");
        assert_eq!(layout.cells[28].date, "2024-02-29");
        assert_eq!(layout.title(), "February 2024");
    }

    #[test]
    fn layout_for_month_starting_on_saturday() {
        // June 2024 starts on a Saturday.
        let layout = MonthLayout::new(2024, 5).expect("valid month");
        assert_eq!(layout.leading_blanks, 6);
        assert_eq!(layout.cells.len(), 30);
        assert_eq!(layout.cells[29].date, "2024-06-30");
    }

    #[test]
    fn out_of_range_month_has_no_layout() {
        assert!(MonthLayout::new(2023, 12).is_none());
    }
}
