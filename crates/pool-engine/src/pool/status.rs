/// Where human-readable status lines go (the host's single-line status text).
/// Informational only; the rule state stays the source of truth.
pub trait StatusSink {
    fn report(&mut self, message: &str);
}

/// Writes every status line to the `log` facade and keeps the latest one.
#[derive(Debug, Default, Clone)]
pub struct LogStatus {
    last: String,
}

impl LogStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

impl StatusSink for LogStatus {
    fn report(&mut self, message: &str) {
        log::info!("{}", message);
        self.last.clear();
        self.last.push_str(message);
    }
}

/// Collects every line; handy for asserting on rule output.
impl StatusSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}
