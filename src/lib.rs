// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod cli;
pub mod commands;
pub mod db;
pub mod errors;
pub mod models;
pub mod recurrence;
pub mod requests;
pub mod service;
pub mod store;
pub mod utils;
