//! Shared test harness modules for the hop CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod schedule_steps;
mod schedule_unit;
