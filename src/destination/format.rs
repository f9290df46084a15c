use crate::domain::Metadata;

/// Transaction label used by the console destination.
pub const CONSOLE_TRANSACTION_LABEL: &str = "Transaction: ";
/// Transaction label used by the file destination.
pub const FILE_TRANSACTION_LABEL: &str = "Transaction ID: ";

/// Conditional-prefix line layout shared by the text destinations:
///
/// `[Process: <id> - ][<timestamp> - ][<label><id> - ]<message>`
///
/// Each prefix appears only when its flag is on and the metadata value is
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    pub log_process_id: bool,
    pub log_timestamp: bool,
    pub log_transaction_id: bool,
    pub transaction_label: &'static str,
}

impl LineFormat {
    pub fn render(&self, message: &str, metadata: &Metadata) -> String {
        let mut line = String::with_capacity(message.len() + 64);

        if self.log_process_id
            && let Some(process_id) = metadata.process_id()
        {
            line.push_str("Process: ");
            line.push_str(&process_id);
            line.push_str(" - ");
        }

        if self.log_timestamp
            && let Some(timestamp) = metadata.timestamp_text()
        {
            line.push_str(&timestamp);
            line.push_str(" - ");
        }

        if self.log_transaction_id
            && let Some(transaction_id) = metadata.transaction_id()
        {
            line.push_str(self.transaction_label);
            line.push_str(&transaction_id);
            line.push_str(" - ");
        }

        line.push_str(message);
        line
    }
}
