/// Single-slot history backing the `!!` recall operator.
#[derive(Debug, Default, Clone)]
pub struct HistoryCell {
    last: Option<String>,
}

impl HistoryCell {
    pub fn new() -> Self {
        Self::default()
    }

    // Overwrites whatever was stored before
    pub fn record(&mut self, line: &str) {
        self.last = Some(line.to_string());
    }

    pub fn recall(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}
