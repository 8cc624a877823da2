use serde::Serialize;

/// Sort direction for table columns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Column enums of sortable tables implement this to round-trip through
/// query strings.
pub trait SortableColumn: Sized + Default + Clone + PartialEq {
    fn from_str(s: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

/// Sort state handed to templates for rendering column headers.
#[derive(Debug, Clone)]
pub struct TableSort<C: SortableColumn> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: SortableColumn> TableSort<C> {
    pub fn is_active(&self, col: &C) -> bool {
        &self.column == col
    }

    /// Toggle when already sorted by `col`, otherwise start descending.
    pub fn next_direction_for(&self, col: &C) -> SortDirection {
        if self.is_active(col) {
            self.direction.toggle()
        } else {
            SortDirection::Desc
        }
    }

    pub fn indicator(&self, col: &C) -> &'static str {
        if self.is_active(col) {
            match self.direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            }
        } else {
            ""
        }
    }

    pub fn query_string_for(&self, col: &C) -> String {
        let dir = self.next_direction_for(col);
        format!("sort={}&dir={}", col.as_str(), dir.as_str())
    }

    // String-based variants for templates

    pub fn indicator_str(&self, col_name: &str) -> &'static str {
        match C::from_str(col_name) {
            Some(col) => self.indicator(&col),
            None => "",
        }
    }

    pub fn query_string_for_str(&self, col_name: &str) -> String {
        match C::from_str(col_name) {
            Some(col) => self.query_string_for(&col),
            None => String::new(),
        }
    }
}

impl<C: SortableColumn> Default for TableSort<C> {
    fn default() -> Self {
        Self {
            column: C::default(),
            direction: SortDirection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    enum Col {
        #[default]
        Date,
        Amount,
    }

    impl SortableColumn for Col {
        fn from_str(s: &str) -> Option<Self> {
            match s {
                "date" => Some(Self::Date),
                "amount" => Some(Self::Amount),
                _ => None,
            }
        }

        fn as_str(&self) -> &'static str {
            match self {
                Self::Date => "date",
                Self::Amount => "amount",
            }
        }
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(SortDirection::from_str("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::from_str("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::from_str("sideways"), SortDirection::Desc);
        assert_eq!(SortDirection::Asc.toggle(), SortDirection::Desc);
    }

    #[test]
    fn test_header_links() {
        let sort = TableSort::<Col>::default();
        assert_eq!(sort.indicator_str("date"), "▼");
        assert_eq!(sort.indicator_str("amount"), "");
        assert_eq!(sort.query_string_for_str("date"), "sort=date&dir=asc");
        assert_eq!(sort.query_string_for_str("amount"), "sort=amount&dir=desc");
        assert_eq!(sort.query_string_for_str("bogus"), "");
    }
}
