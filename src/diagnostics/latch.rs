//! Per-instance switches for one-time and rate-limited log output.

/// Remembers which one-time diagnostics a detector already printed.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticsLatch {
    strides_logged: bool,
    corridor_logged: bool,
}

impl DiagnosticsLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time it is called.
    pub fn first_scale_table(&mut self) -> bool {
        !std::mem::replace(&mut self.strides_logged, true)
    }

    /// `true` the first time it is called.
    pub fn first_corridor(&mut self) -> bool {
        !std::mem::replace(&mut self.corridor_logged, true)
    }
}

/// Caps how many warnings of one kind are logged.
#[derive(Clone, Debug)]
pub struct WarningBudget {
    emitted: usize,
    max: usize,
}

impl WarningBudget {
    pub fn new(max: usize) -> Self {
        Self { emitted: 0, max }
    }

    /// Consumes one warning slot; `false` once the budget is spent.
    pub fn try_take(&mut self) -> bool {
        if self.emitted < self.max {
            self.emitted += 1;
            true
        } else {
            false
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_exhausted(&self) -> bool {
        self.emitted >= self.max
    }
}
