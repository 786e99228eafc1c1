//! Clock used for creation and modification timestamps
//!
//! The offset is configuration, handed to every operation that stamps a document.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Offset;
use chrono::Utc;

/// Wall clock in a configured timezone offset
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    /// Offset all timestamps are expressed in
    offset: FixedOffset,
}

impl Clock {
    /// Create a clock for a given offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Current time in the configured offset
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}
