use crate::diff::model::{DiffResult, DiffStrategy};

/// Exact byte comparison for opaque binary formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BytesDiff;

impl DiffStrategy<Vec<u8>> for BytesDiff {
    fn compare(&self, reference: &Vec<u8>, actual: &Vec<u8>) -> Option<DiffResult> {
        if reference == actual {
            return None;
        }

        let mut message = format!(
            "Expected {} bytes to match {} bytes",
            actual.len(),
            reference.len()
        );
        if let Some(offset) = first_difference(reference, actual) {
            message.push_str(&format!(" (first difference at offset {})", offset));
        }
        Some(DiffResult::new(message))
    }
}

/// Offset of the first differing byte, or the shorter length when one
/// slice is a prefix of the other
fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_bytes_match() {
        assert!(BytesDiff.compare(&vec![1, 2, 3], &vec![1, 2, 3]).is_none());
        assert!(BytesDiff.compare(&vec![], &vec![]).is_none());
    }

    #[test]
    fn test_mismatch_reports_sizes_and_offset() {
        let result = BytesDiff.compare(&vec![1, 2, 3], &vec![1, 9, 3, 4]).unwrap();
        assert_eq!(
            result.message,
            "Expected 4 bytes to match 3 bytes (first difference at offset 1)"
        );
        assert!(result.artifacts.is_empty());
    }

    #[test]
    fn test_prefix_reports_shorter_length() {
        let result = BytesDiff.compare(&vec![1, 2], &vec![1, 2, 3]).unwrap();
        assert!(result.message.ends_with("offset 2)"));
    }
}
