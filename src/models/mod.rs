pub mod category;
pub mod summary;
pub mod transaction;

pub use category::Category;
pub use summary::{CategorySummary, DailyTotal, IncomeSummary, MonthSummary, SourceSummary};
pub use transaction::{Expense, ExpensePatch, Income, IncomePatch, NewExpense, NewIncome};
