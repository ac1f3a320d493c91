pub mod employee;
pub mod imported_row;
