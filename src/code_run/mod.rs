pub mod expectations;
pub mod run;
pub mod run_iface;
pub mod steps;
pub mod suite;
