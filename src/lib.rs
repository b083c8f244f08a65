// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod countdown;
pub mod db;
pub mod errors;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod payments;
pub mod referral;
pub mod session;
pub mod ticker;
pub mod utils;
