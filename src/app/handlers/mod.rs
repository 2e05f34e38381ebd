// SPDX-License-Identifier: GPL-3.0-only

//! Message handlers, grouped by functional domain

mod devices;
mod session;
mod system;

pub(crate) use devices::scan_devices_task;
