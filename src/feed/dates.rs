use chrono::{Days, NaiveDate};

/// Calendar date selection for the `top` feed, never later than today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStepper {
    selected: NaiveDate,
}

impl DateStepper {
    pub fn new(today: NaiveDate) -> Self {
        Self { selected: today }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.selected >= today
    }

    /// Step back one day. Returns whether the selection changed.
    pub fn prev(&mut self) -> bool {
        match self.selected.checked_sub_days(Days::new(1)) {
            Some(day) => {
                self.selected = day;
                true
            }
            None => false,
        }
    }

    /// Step forward one day; disabled once today is selected.
    pub fn next(&mut self, today: NaiveDate) -> bool {
        if self.is_today(today) {
            return false;
        }
        match self.selected.checked_add_days(Days::new(1)) {
            Some(day) => {
                self.selected = day.min(today);
                true
            }
            None => false,
        }
    }

    /// Select an arbitrary date, clamped to today.
    pub fn pick(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        let date = date.min(today);
        let changed = date != self.selected;
        self.selected = date;
        changed
    }

    pub fn today(&mut self, today: NaiveDate) -> bool {
        self.pick(today, today)
    }
}
