//! Payment mode master data (e.g. 'Cash', 'Card', 'Bank Transfer').

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod payment_modes_page;

pub use core::{
    PaymentMode, count_payment_modes, create_payment_mode, create_payment_modes_table,
    get_all_payment_modes, get_payment_mode, map_row_to_payment_mode,
};
pub use create_endpoint::create_payment_mode_endpoint;
pub use create_page::get_create_payment_mode_page;
pub use delete_endpoint::delete_payment_mode_endpoint;
pub use edit_endpoint::edit_payment_mode_endpoint;
pub use edit_page::get_edit_payment_mode_page;
pub use payment_modes_page::get_payment_modes_page;
