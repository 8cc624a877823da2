use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Config;
use crate::date_utils::Period;
use crate::filters::Money;
use crate::storage::{SqliteStore, TransactionStore};

/// Source of "today" for handlers. Pure code never reads the clock itself.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System => chrono::Local::now().date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub config: Arc<Config>,
    /// The on-device database while the remote store is active, kept so its
    /// records can be migrated. `None` when the local store is the active one.
    pub local: Option<Arc<SqliteStore>>,
    pub clock: Clock,
}

impl AppState {
    pub fn money(&self) -> Money {
        Money::new(&self.config.currency, &self.config.locale)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn current_period(&self) -> Period {
        Period::from_date(self.today())
    }
}
