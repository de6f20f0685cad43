pub mod exit_policy;
pub mod use_cases;
