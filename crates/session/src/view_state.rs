use compute::year_index::YearIndex;

/// The year on screen and the lookup built for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    selected_year: i32,
    active_index: Option<YearIndex>,
}

impl ViewState {
    pub fn new(selected_year: i32) -> Self {
        Self {
            selected_year,
            active_index: None,
        }
    }

    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    pub fn active_index(&self) -> Option<&YearIndex> {
        self.active_index.as_ref()
    }

    /// Replaces both fields together so the index always matches the year.
    pub fn select(&mut self, index: YearIndex) {
        self.selected_year = index.year();
        self.active_index = Some(index);
    }

    /// Value for `code` in the selected year; `None` before the first
    /// selection or when the country has no data.
    pub fn value_of(&self, code: Option<&str>) -> Option<f64> {
        let code = code?;
        self.active_index.as_ref()?.get(code)
    }
}
