// SPDX-License-Identifier: MPL-2.0

//! Camera backend: PipeWire enumeration and the preview pipeline

pub mod pipewire;
pub mod types;

pub use types::*;
