//! Widgets composing the flipdeck dashboard.

pub mod emails_table;
pub mod form;
pub mod help;
pub mod inventory_table;
pub mod log_list;
pub mod overview;
pub mod payments_table;
pub mod tab_bar;
