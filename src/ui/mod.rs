//! Console output helpers for the CLI
//!
//! Status lines go to stdout with `console` styling, which switches itself
//! off when stdout is not a terminal. Payload output (`fscache get`) never
//! goes through here.

mod output;

pub use output::{key_value, remark, section, step_ok, step_ok_detail, step_warn_hint};
