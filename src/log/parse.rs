use serde_json::Value;
use std::io::{BufRead, Lines};
use tracing::{debug, warn};

/// How much of a rejected buffer is echoed in the warning.
const PREVIEW_CHARS: usize = 80;

/// Counters kept while extracting, readable during and after iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Buffers that reached a terminating `]` and were handed to the JSON parser.
    pub fragments: usize,
    /// Fragments that failed to parse or were not a non-empty array.
    pub malformed: usize,
    /// Array elements after index 0, ignored.
    pub extra_elements: usize,
    /// 1 when input ended with a non-empty, never-terminated buffer.
    pub unterminated: usize,
}

impl ExtractStats {
    pub fn dropped(&self) -> usize {
        self.malformed + self.unterminated
    }
}

/// Lazy, single-pass extractor over a line-oriented stats dump.
///
/// Lines are trimmed and concatenated into a buffer until a line ends with
/// `]`. The buffer is then parsed as a JSON array and its first element is
/// yielded. Nesting depth is not tracked: a `]` closing an inner array at the
/// end of a line triggers a parse attempt too, and the buffer is cleared
/// whether or not that attempt succeeds.
///
/// Example input (one snapshot):
/// [
///   {"mem_usage": "5.112MB / 7.716GB", "cpu_percent": "6.05%"}
/// ]
pub struct SnapshotExtractor<R> {
    lines: Lines<R>,
    buffer: String,
    stats: ExtractStats,
    finished: bool,
}

impl<R: BufRead> SnapshotExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            buffer: String::new(),
            stats: ExtractStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> ExtractStats {
        self.stats
    }

    /// Try one terminated buffer. Returns the first array element on success.
    fn take_first(&mut self, fragment: &str) -> Option<Value> {
        self.stats.fragments += 1;

        let failure = match serde_json::from_str::<Value>(fragment) {
            Ok(Value::Array(items)) => {
                let mut items = items.into_iter();
                match items.next() {
                    Some(first) => {
                        self.stats.extra_elements += items.len();
                        return Some(first);
                    }
                    None => "empty array".to_string(),
                }
            }
            Ok(_) => "expected a JSON array".to_string(),
            Err(e) => e.to_string(),
        };

        self.stats.malformed += 1;
        warn!(
            fragment = preview(fragment),
            error = %failure,
            "skipping unparsable stats fragment"
        );
        None
    }

    fn finish(&mut self) {
        self.finished = true;
        if !self.buffer.is_empty() {
            self.stats.unterminated = 1;
            debug!(
                fragment = preview(&self.buffer),
                "input ended inside an unterminated fragment"
            );
            self.buffer.clear();
        }
    }
}

impl<R: BufRead> Iterator for SnapshotExtractor<R> {
    type Item = std::io::Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finish();
                    return None;
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            self.buffer.push_str(line);
            if !line.ends_with(']') {
                continue;
            }

            let fragment = std::mem::take(&mut self.buffer);
            if let Some(first) = self.take_first(&fragment) {
                return Some(Ok(first));
            }
        }
    }
}

/// First `PREVIEW_CHARS` characters, cut on a char boundary.
fn preview(s: &str) -> &str {
    match s.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
