// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod route;
mod search;

pub use route::{Route, RouteOutcome, DEFAULT_STEP_LIMIT};
pub use search::find_route;
