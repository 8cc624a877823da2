pub mod carry_over;
pub mod expense_filter;
pub mod report;
pub mod summary;
pub mod treemap;
