//! Line-oriented text diff.
//!
//! Documents are split on `'\n'` keeping empty pieces, so a trailing blank
//! line is a line like any other. The edit script comes from the
//! linear-space form of Myers' O(ND) algorithm, so rewriting a large
//! document costs memory proportional to its length only.

use crate::diff::model::{Artifact, ArtifactKind, DiffResult, DiffStrategy};

/// Unchanged lines shown around each change
pub const DEFAULT_CONTEXT: usize = 4;

/// Width at which lines are cut in failure messages
pub const MAX_MESSAGE_LINE_WIDTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    Equal,
    Delete,
    Insert,
}

impl LineOp {
    fn marker(self) -> char {
        match self {
            LineOp::Equal => ' ',
            LineOp::Delete => '-',
            LineOp::Insert => '+',
        }
    }
}

/// One step of an edit script, positioned in both documents.
///
/// For `Delete` the `new_index` is the cursor in the new document; for
/// `Insert` the `old_index` is the cursor in the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub op: LineOp,
    pub old_index: usize,
    pub new_index: usize,
}

impl Edit {
    fn new(op: LineOp, old_index: usize, new_index: usize) -> Self {
        Self {
            op,
            old_index,
            new_index,
        }
    }
}

/// Compute a minimal edit script turning `old` into `new`
///
/// Within each run of changes, deletions come before insertions.
pub fn diff_lines(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let mut ops = Vec::with_capacity(old.len() + new.len());
    let bound = (old.len() + new.len() + 1) / 2 + 1;
    let mut forward = Frontier::new(bound);
    let mut backward = Frontier::new(bound);
    conquer(old, new, &mut forward, &mut backward, &mut ops);

    let mut edits = Vec::with_capacity(ops.len());
    let (mut x, mut y) = (0, 0);
    let mut i = 0;
    while i < ops.len() {
        if ops[i] == LineOp::Equal {
            edits.push(Edit::new(LineOp::Equal, x, y));
            x += 1;
            y += 1;
            i += 1;
            continue;
        }
        let run_end = ops[i..]
            .iter()
            .position(|op| *op == LineOp::Equal)
            .map_or(ops.len(), |p| i + p);
        let deletions = ops[i..run_end]
            .iter()
            .filter(|op| **op == LineOp::Delete)
            .count();
        for _ in 0..deletions {
            edits.push(Edit::new(LineOp::Delete, x, y));
            x += 1;
        }
        for _ in deletions..run_end - i {
            edits.push(Edit::new(LineOp::Insert, x, y));
            y += 1;
        }
        i = run_end;
    }
    edits
}

/// Furthest x reached on each diagonal `k = x - y`
struct Frontier {
    v: Vec<isize>,
    offset: isize,
}

impl Frontier {
    fn new(bound: usize) -> Self {
        Self {
            v: vec![0; 2 * bound + 2],
            offset: bound as isize,
        }
    }
}

impl std::ops::Index<isize> for Frontier {
    type Output = isize;

    fn index(&self, k: isize) -> &isize {
        &self.v[(k + self.offset) as usize]
    }
}

impl std::ops::IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut isize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn common_prefix(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[&str], b: &[&str]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn push_n(ops: &mut Vec<LineOp>, op: LineOp, n: usize) {
    ops.resize(ops.len() + n, op);
}

/// Linear-space Myers: split at the middle snake and recurse on both halves
fn conquer(
    a: &[&str],
    b: &[&str],
    forward: &mut Frontier,
    backward: &mut Frontier,
    ops: &mut Vec<LineOp>,
) {
    let prefix = common_prefix(a, b);
    push_n(ops, LineOp::Equal, prefix);
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = common_suffix(a, b);
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    if a.is_empty() {
        push_n(ops, LineOp::Insert, b.len());
    } else if b.is_empty() {
        push_n(ops, LineOp::Delete, a.len());
    } else if let Some((x, y)) = middle_snake(a, b, forward, backward) {
        conquer(&a[..x], &b[..y], forward, backward, ops);
        conquer(&a[x..], &b[y..], forward, backward, ops);
    } else {
        push_n(ops, LineOp::Delete, a.len());
        push_n(ops, LineOp::Insert, b.len());
    }

    push_n(ops, LineOp::Equal, suffix);
}

/// Where an optimal path crosses the middle of the edit graph
///
/// Both searches run one round at a time from opposite corners until
/// their frontiers overlap on a diagonal. Only the current frontiers are
/// kept, so memory stays linear in the input.
fn middle_snake(
    a: &[&str],
    b: &[&str],
    forward: &mut Frontier,
    backward: &mut Frontier,
) -> Option<(usize, usize)> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let delta = n - m;
    let odd = delta & 1 == 1;
    forward[1] = 0;
    backward[1] = 0;
    let bound = (n + m + 1) / 2 + 1;

    for d in 0..bound {
        let mut k = -d;
        while k <= d {
            let x0 = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                forward[k + 1]
            } else {
                forward[k - 1] + 1
            };
            let y0 = x0 - k;
            let mut x = x0;
            if x0 < n && y0 < m {
                x += common_prefix(&a[x0 as usize..], &b[y0 as usize..]) as isize;
            }
            forward[k] = x;
            if odd && (k - delta).abs() < d && x + backward[delta - k] >= n {
                return Some((x0 as usize, y0 as usize));
            }
            k += 2;
        }

        let mut k = -d;
        while k <= d {
            let x0 = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                backward[k + 1]
            } else {
                backward[k - 1] + 1
            };
            let y0 = x0 - k;
            let mut x = x0;
            if x0 < n && y0 < m {
                x += common_suffix(&a[..(n - x0) as usize], &b[..(m - y0) as usize]) as isize;
            }
            backward[k] = x;
            if !odd && (k - delta).abs() <= d && x + forward[delta - k] >= n {
                return Some(((n - x) as usize, (m - (x - k)) as usize));
            }
            k += 2;
        }
    }
    None
}

/// A contiguous block of changes with its surrounding context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based first old line (0 when the hunk only inserts)
    pub old_start: usize,
    pub old_len: usize,
    /// 1-based first new line (0 when the hunk only deletes)
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<(LineOp, String)>,
}

impl Hunk {
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        )
    }

    /// Number of lines removed from the old document
    pub fn deletions(&self) -> usize {
        self.count(LineOp::Delete)
    }

    /// Number of lines added by the new document
    pub fn insertions(&self) -> usize {
        self.count(LineOp::Insert)
    }

    fn count(&self, op: LineOp) -> usize {
        self.lines.iter().filter(|(o, _)| *o == op).count()
    }

    fn render(&self, max_width: Option<usize>) -> String {
        let mut out = self.header();
        for (op, text) in &self.lines {
            out.push('\n');
            out.push(op.marker());
            match max_width {
                Some(width) if text.chars().count() > width => {
                    out.extend(text.chars().take(width));
                    out.push('…');
                }
                _ => out.push_str(text),
            }
        }
        out
    }
}

/// Group an edit script into hunks
///
/// Changes separated by at most `2 * context` unchanged lines share a hunk.
/// With `context == 0` every hunk is a maximal run of changed lines.
pub fn hunks(old: &[&str], new: &[&str], edits: &[Edit], context: usize) -> Vec<Hunk> {
    let changes: Vec<usize> = edits
        .iter()
        .enumerate()
        .filter(|(_, e)| e.op != LineOp::Equal)
        .map(|(i, _)| i)
        .collect();

    let mut hunks = Vec::new();
    let mut i = 0;
    while i < changes.len() {
        let first = changes[i];
        let mut last = first;
        let mut j = i + 1;
        while j < changes.len() && changes[j] - last - 1 <= 2 * context {
            last = changes[j];
            j += 1;
        }

        let start = first.saturating_sub(context);
        let end = (last + context + 1).min(edits.len());
        hunks.push(build_hunk(old, new, &edits[start..end]));
        i = j;
    }
    hunks
}

fn build_hunk(old: &[&str], new: &[&str], edits: &[Edit]) -> Hunk {
    let (old_before, new_before) = edits
        .first()
        .map(|e| (e.old_index, e.new_index))
        .unwrap_or((0, 0));

    let lines: Vec<(LineOp, String)> = edits
        .iter()
        .map(|e| {
            let text = match e.op {
                LineOp::Equal | LineOp::Delete => old[e.old_index],
                LineOp::Insert => new[e.new_index],
            };
            (e.op, text.to_string())
        })
        .collect();

    let old_len = lines.iter().filter(|(op, _)| *op != LineOp::Insert).count();
    let new_len = lines.iter().filter(|(op, _)| *op != LineOp::Delete).count();

    Hunk {
        old_start: if old_len > 0 { old_before + 1 } else { old_before },
        old_len,
        new_start: if new_len > 0 { new_before + 1 } else { new_before },
        new_len,
        lines,
    }
}

/// Render hunks as patch text, optionally cutting long lines
pub fn render_hunks(hunks: &[Hunk], max_width: Option<usize>) -> String {
    hunks
        .iter()
        .map(|h| h.render(max_width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Line diff over text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDiff {
    pub context: usize,
}

impl Default for LineDiff {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
        }
    }
}

impl LineDiff {
    pub fn with_context(context: usize) -> Self {
        Self { context }
    }

    /// Compute the hunks between two documents
    pub fn hunks(&self, reference: &str, actual: &str) -> Vec<Hunk> {
        let old: Vec<&str> = reference.split('\n').collect();
        let new: Vec<&str> = actual.split('\n').collect();
        let edits = diff_lines(&old, &new);
        hunks(&old, &new, &edits, self.context)
    }
}

impl DiffStrategy<String> for LineDiff {
    fn compare(&self, reference: &String, actual: &String) -> Option<DiffResult> {
        if reference == actual {
            return None;
        }

        let hunks = self.hunks(reference, actual);
        if hunks.is_empty() {
            return None;
        }

        let message = render_hunks(&hunks, Some(MAX_MESSAGE_LINE_WIDTH));
        let patch = render_hunks(&hunks, None);
        Some(DiffResult::new(message).with_artifact(Artifact::new(
            ArtifactKind::Difference,
            "text/x-diff",
            patch.into_bytes(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn split(s: &str) -> Vec<&str> {
        s.split('\n').collect()
    }

    fn rebuild(old: &[&str], new: &[&str], edits: &[Edit]) -> (Vec<String>, Vec<String>) {
        let mut a = Vec::new();
        let mut b = Vec::new();
        for e in edits {
            match e.op {
                LineOp::Equal => {
                    a.push(old[e.old_index].to_string());
                    b.push(new[e.new_index].to_string());
                }
                LineOp::Delete => a.push(old[e.old_index].to_string()),
                LineOp::Insert => b.push(new[e.new_index].to_string()),
            }
        }
        (a, b)
    }

    fn lcs_len(a: &[&str], b: &[&str]) -> usize {
        let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in (0..a.len()).rev() {
            for j in (0..b.len()).rev() {
                table[i][j] = if a[i] == b[j] {
                    table[i + 1][j + 1] + 1
                } else {
                    table[i + 1][j].max(table[i][j + 1])
                };
            }
        }
        table[0][0]
    }

    #[test]
    fn test_identical_text_has_no_diff() {
        let text = "Line 1\nLine 2\nLine 3".to_string();
        assert!(LineDiff::default().compare(&text, &text).is_none());
    }

    #[test]
    fn test_modified_and_added_lines_form_one_hunk() {
        let old = "Line 1\nLine 2\nLine 3".to_string();
        let new = "Line 1\nLine 2 Modified\nLine 3\nLine 4 Added".to_string();

        let hunks = LineDiff::default().hunks(&old, &new);
        assert_eq!(hunks.len(), 1);

        let hunk = &hunks[0];
        assert_eq!(hunk.header(), "@@ -1,3 +1,4 @@");
        assert!(hunk.lines.contains(&(LineOp::Delete, "Line 2".to_string())));
        assert!(hunk
            .lines
            .contains(&(LineOp::Insert, "Line 2 Modified".to_string())));
        assert!(hunk
            .lines
            .contains(&(LineOp::Insert, "Line 4 Added".to_string())));
        assert_eq!(hunk.deletions(), 1);
        assert_eq!(hunk.insertions(), 2);

        let result = LineDiff::default().compare(&old, &new).unwrap();
        assert!(result.message.contains("-Line 2\n+Line 2 Modified"));
        assert_eq!(result.artifacts.len(), 1);
        assert_eq!(result.artifacts[0].kind, ArtifactKind::Difference);
    }

    #[test]
    fn test_trailing_blank_line_is_significant() {
        let old = "a\nb".to_string();
        let new = "a\nb\n".to_string();
        let result = LineDiff::default().compare(&old, &new).unwrap();
        assert!(result.message.contains("\n+"));
    }

    #[test]
    fn test_zero_context_keeps_maximal_runs_apart() {
        let old = "a\nb\nc\nd\ne";
        let new = "a\nB\nc\nd\nE";
        let hunks = LineDiff::with_context(0).hunks(old, new);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].header(), "@@ -2,1 +2,1 @@");
        assert_eq!(hunks[1].header(), "@@ -5,1 +5,1 @@");
        assert!(hunks
            .iter()
            .all(|h| h.lines.iter().all(|(op, _)| *op != LineOp::Equal)));
    }

    #[test]
    fn test_distant_changes_split_into_hunks() {
        let old: Vec<String> = (0..30).map(|i| format!("line {}", i)).collect();
        let mut new = old.clone();
        new[2] = "changed 2".to_string();
        new[25] = "changed 25".to_string();
        let hunks = LineDiff::default().hunks(&old.join("\n"), &new.join("\n"));
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].old_start, 1);
        assert_eq!(hunks[1].header(), "@@ -22,9 +22,9 @@");
    }

    #[test]
    fn test_pure_insertion_into_empty_document() {
        let edits = diff_lines(&[], &["x", "y"]);
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|e| e.op == LineOp::Insert));
    }

    #[test]
    fn test_message_lines_are_truncated_but_patch_is_not() {
        let long = "x".repeat(MAX_MESSAGE_LINE_WIDTH + 50);
        let old = "short".to_string();
        let result = LineDiff::default().compare(&old, &long).unwrap();

        assert!(result.message.contains('…'));
        assert!(!result.message.contains(&long));
        let patch = String::from_utf8(result.artifacts[0].bytes.clone()).unwrap();
        assert!(patch.contains(&long));
    }

    #[test]
    fn test_deletions_precede_insertions() {
        let old = split("a\nb\nc");
        let new = split("a\nx\nc");
        let ops: Vec<LineOp> = diff_lines(&old, &new).iter().map(|e| e.op).collect();
        assert_eq!(
            ops,
            vec![LineOp::Equal, LineOp::Delete, LineOp::Insert, LineOp::Equal]
        );
    }

    #[test]
    fn test_fully_rewritten_large_document() {
        // Given: two 3000-line documents sharing no line
        let old: Vec<String> = (0..3000).map(|i| format!("old {}", i)).collect();
        let new: Vec<String> = (0..3000).map(|i| format!("new {}", i)).collect();
        let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
        let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();

        // When: diffing them
        let edits = diff_lines(&old_refs, &new_refs);

        // Then: every old line is deleted, every new line inserted, in order
        assert_eq!(edits.len(), 6000);
        assert!(edits[..3000].iter().all(|e| e.op == LineOp::Delete));
        assert!(edits[3000..].iter().all(|e| e.op == LineOp::Insert));
        let (a, b) = rebuild(&old_refs, &new_refs, &edits);
        assert_eq!(a, old);
        assert_eq!(b, new);
    }

    #[test]
    fn test_large_document_with_scattered_edits_stays_minimal() {
        let old: Vec<String> = (0..2000).map(|i| format!("line {}", i)).collect();
        let mut new = old.clone();
        for i in (0..2000).step_by(100) {
            new[i] = format!("edited {}", i);
        }
        let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
        let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();

        let edits = diff_lines(&old_refs, &new_refs);

        let deletes = edits.iter().filter(|e| e.op == LineOp::Delete).count();
        let inserts = edits.iter().filter(|e| e.op == LineOp::Insert).count();
        assert_eq!((deletes, inserts), (20, 20));
        let (a, b) = rebuild(&old_refs, &new_refs, &edits);
        assert_eq!(a, old);
        assert_eq!(b, new);
    }

    proptest! {
        #[test]
        fn prop_edit_script_rebuilds_both_documents(
            old in prop::collection::vec("[abc]{0,2}", 0..12),
            new in prop::collection::vec("[abc]{0,2}", 0..12),
        ) {
            let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
            let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();
            let edits = diff_lines(&old_refs, &new_refs);
            let (a, b) = rebuild(&old_refs, &new_refs, &edits);
            prop_assert_eq!(a, old);
            prop_assert_eq!(b, new);
        }

        #[test]
        fn prop_edit_script_keeps_a_longest_common_subsequence(
            old in prop::collection::vec("[abc]", 0..12),
            new in prop::collection::vec("[abc]", 0..12),
        ) {
            let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
            let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();
            let kept = diff_lines(&old_refs, &new_refs)
                .iter()
                .filter(|e| e.op == LineOp::Equal)
                .count();
            prop_assert_eq!(kept, lcs_len(&old_refs, &new_refs));
        }

        #[test]
        fn prop_diff_is_none_iff_equal(
            old in "[ab\n]{0,16}",
            new in "[ab\n]{0,16}",
        ) {
            let result = LineDiff::default().compare(&old, &new);
            prop_assert_eq!(result.is_none(), old == new);
        }
    }
}
