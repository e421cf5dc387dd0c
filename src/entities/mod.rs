//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod expense;
pub mod income;
pub mod ticket;
pub mod ticket_reply;
pub mod user;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use expense::{
    Column as ExpenseColumn, Entity as Expense, ExpenseStatus, Model as ExpenseModel,
};
pub use income::{Column as IncomeColumn, Entity as Income, Model as IncomeModel};
pub use ticket::{Column as TicketColumn, Entity as Ticket, Model as TicketModel};
pub use ticket_reply::{
    Column as TicketReplyColumn, Entity as TicketReply, Model as TicketReplyModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
