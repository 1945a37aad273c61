//! Prelude module for convenient imports.
//!
//! ```
//! use dashcam::prelude::*;
//! ```

pub use crate::application::Application;
pub use crate::command::{Action, Command};
pub use crate::runtime::Runtime;
pub use crate::subscription::Subscription;
