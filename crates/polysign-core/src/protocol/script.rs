//! Page scripts
//!
//! A page script is a JSON file holding an optional sign configuration and
//! the pages to send, in order:
//!
//! ```json
//! {
//!   "sign": { "width": 16, "lines": 2 },
//!   "pages": [
//!     { "line1": "HELLO", "line2": "WORLD",
//!       "options": { "center": true, "duration": 4 } },
//!     { "line1": "time", "options": { "center": true } },
//!     { "line1": "THE", "line2": "END.", "options": { "last": true } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use super::{PageRequest, Sign, SignChannel, SignConfig, SignError};

/// Pages to send to a sign, with optional sign settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageScript {
    /// Overrides for the sign configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<SignConfig>,
    /// Pages in display order
    #[serde(default)]
    pub pages: Vec<PageRequest>,
}

impl PageScript {
    /// Parse a script from JSON text
    pub fn from_json(content: &str) -> io::Result<Self> {
        serde_json::from_str(content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Load a script from a file
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Send every page in order, stopping at the first failure.
    ///
    /// Returns the number of pages the sign accepted.
    pub fn run<C: SignChannel>(&self, sign: &mut Sign<C>) -> Result<usize, SignError> {
        for (index, page) in self.pages.iter().enumerate() {
            sign.page(page).map_err(|e| {
                tracing::warn!(index, "script stopped: {}", e);
                e
            })?;
        }
        Ok(self.pages.len())
    }
}
