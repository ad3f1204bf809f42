//! Repository implementations for database access

pub mod expenses;
pub mod properties;

pub use expenses::{Expense, ExpenseRepo, ExpenseWithProperty, NewExpense};
pub use properties::{DbError, Property, PropertyRepo};
