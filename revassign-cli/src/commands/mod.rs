//! CLI command implementations
//!
//! Each command runs one service operation and returns its JSON body.

pub mod pr;
pub mod stats;
pub mod team;
pub mod user;

pub use pr::PrArgs;
pub use team::TeamArgs;
pub use user::UserArgs;

use revassign_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;

fn render(body: impl Serialize) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::Io(e.into()))
}
