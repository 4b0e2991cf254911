use std::io::{self, Read};
use std::path::Path;

/// Bytes inspected by content sniffing.
pub const SNIFF_LEN: u64 = 8192;

/// Assigns a type label to a stored file by inspecting its content.
pub trait TypeClassifier: Send + Sync {
    /// `Ok(None)` when the content matches no known signature.
    fn classify(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Magic-byte sniffer. Labels look like `pdf (application/pdf)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InferClassifier;

impl TypeClassifier for InferClassifier {
    fn classify(&self, path: &Path) -> io::Result<Option<String>> {
        let mut head = Vec::new();
        std::fs::File::open(path)?
            .take(SNIFF_LEN)
            .read_to_end(&mut head)?;
        Ok(infer::get(&head).map(|kind| format!("{} ({})", kind.extension(), kind.mime_type())))
    }
}

/// Case-insensitive containment of the target type in a label.
pub fn label_matches(label: &str, target: &str) -> bool {
    label
        .to_ascii_lowercase()
        .contains(&target.to_ascii_lowercase())
}
