pub mod chrome;
pub mod employee;
pub mod form;
pub mod import;

#[cfg(test)]
pub(crate) mod test_support;
