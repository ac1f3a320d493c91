pub mod chrome;
pub mod importer;
pub mod registrar;
pub mod session_gate;
