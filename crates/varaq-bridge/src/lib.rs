// SPDX-License-Identifier: MIT
//
// varaq-bridge — Platform capability seams for the Varaq scanner.
//
// The scanner core never talks to media or network APIs directly; it goes
// through the narrow traits defined here. Real implementations live in the
// host shell (browser, mobile webview); `stub` provides always-unavailable
// implementations and `memory` provides in-process ones for desktop and CI.

pub mod memory;
pub mod stub;
pub mod traits;

pub use memory::{FixedCamera, MemoryPicker, MemoryStore};
pub use stub::StubBridge;
pub use traits::*;
