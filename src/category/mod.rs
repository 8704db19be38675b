//! Category master data for classifying transactions.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    count_categories, create_categories_table, create_category, get_all_categories, get_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryName};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
