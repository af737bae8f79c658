//! Sampled read-back verification
//!
//! Windows are chosen before a pass is written. While the writer streams
//! chunks, [`SampleCapture::feed`] copies the bytes that fall inside each
//! window into a per-window buffer, so memory stays at
//! `samples * verify_len` no matter how large the file is. After the pass
//! is synced, [`SampleCapture::verify`] reads each window back and compares.

use std::io::{self, Read, Seek, SeekFrom};

use rand::{CryptoRng, Rng};
use serde::Serialize;

use crate::error::{Result, ShredError};

/// A byte range selected for verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleWindow {
    pub offset: u64,
    pub len: usize,
}

impl SampleWindow {
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}

/// Choose `count` windows of up to `len` bytes inside a file of `file_size`.
///
/// The window length is clipped to the file size and offsets are drawn so
/// the window always ends inside the file, giving
/// `len == min(verify_len, file_size - offset)` for every window. Windows
/// may overlap or repeat. Returns nothing for empty files.
pub fn choose_windows<R: CryptoRng>(file_size: u64, count: usize, len: usize, rng: &mut R) -> Vec<SampleWindow> {
    if file_size == 0 || count == 0 || len == 0 {
        return Vec::new();
    }

    let len = (len as u64).min(file_size);
    let last_start = file_size - len;

    (0..count)
        .map(|_| SampleWindow {
            offset: rng.random_range(0..=last_start),
            len: len as usize,
        })
        .collect()
}

/// Outcome of comparing one window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleResult {
    pub window: SampleWindow,
    pub matched: bool,
}

/// All window comparisons of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassVerification {
    /// 1-based pass number
    pub pass: usize,
    pub samples: Vec<SampleResult>,
}

impl PassVerification {
    pub fn passed(&self) -> bool {
        self.samples.iter().all(|s| s.matched)
    }
}

/// Per-run aggregate of pass verifications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationSummary {
    pub passes: Vec<PassVerification>,
}

impl VerificationSummary {
    /// True when every recorded comparison matched (trivially true if none)
    pub fn passed(&self) -> bool {
        self.passes.iter().all(PassVerification::passed)
    }

    /// Total number of window comparisons performed
    pub fn comparisons(&self) -> usize {
        self.passes.iter().map(|p| p.samples.len()).sum()
    }
}

/// Expected-bytes accumulator, keyed by window index
#[derive(Debug)]
pub struct SampleCapture {
    windows: Vec<SampleWindow>,
    expected: Vec<Vec<u8>>,
    captured: Vec<usize>,
}

impl SampleCapture {
    pub fn new(windows: Vec<SampleWindow>) -> Self {
        let expected = windows.iter().map(|w| vec![0u8; w.len]).collect();
        let captured = vec![0; windows.len()];
        Self {
            windows,
            expected,
            captured,
        }
    }

    pub fn windows(&self) -> &[SampleWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Record the part of `chunk` (written at `chunk_start`) that overlaps
    /// any window. Chunks of one pass never overlap each other, so the
    /// captured byte count reaches the window length exactly once.
    pub fn feed(&mut self, chunk_start: u64, chunk: &[u8]) {
        let chunk_end = chunk_start + chunk.len() as u64;

        for (i, window) in self.windows.iter().enumerate() {
            if window.end() <= chunk_start || window.offset >= chunk_end {
                continue;
            }

            let overlap_start = window.offset.max(chunk_start);
            let overlap_end = window.end().min(chunk_end);

            let dst = (overlap_start - window.offset) as usize..(overlap_end - window.offset) as usize;
            let src = (overlap_start - chunk_start) as usize..(overlap_end - chunk_start) as usize;

            self.expected[i][dst].copy_from_slice(&chunk[src]);
            self.captured[i] += (overlap_end - overlap_start) as usize;
        }
    }

    /// Fail if any window did not receive all of its bytes
    pub fn ensure_complete(&self, pass: usize) -> Result<()> {
        for (i, window) in self.windows.iter().enumerate() {
            if self.captured[i] != window.len {
                return Err(ShredError::CaptureIncomplete { pass, sample: i + 1 });
            }
        }
        Ok(())
    }

    /// Read every window back from `reader` and compare with the capture.
    ///
    /// Returns the per-window results; the first mismatch becomes a
    /// [`ShredError::Verification`].
    pub fn verify<D: Read + Seek>(&self, reader: &mut D, pass: usize) -> Result<PassVerification> {
        self.ensure_complete(pass)?;

        let mut samples = Vec::with_capacity(self.windows.len());
        for (i, window) in self.windows.iter().enumerate() {
            let actual = read_window(reader, window)?;
            let matched = actual == self.expected[i];

            samples.push(SampleResult {
                window: *window,
                matched,
            });

            if !matched {
                return Err(ShredError::Verification {
                    pass,
                    sample: i + 1,
                    offset: window.offset,
                });
            }
        }

        Ok(PassVerification { pass, samples })
    }
}

/// Read up to `window.len` bytes at `window.offset`; short at EOF
fn read_window<D: Read + Seek>(reader: &mut D, window: &SampleWindow) -> io::Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(window.offset))?;

    let mut buf = Vec::with_capacity(window.len);
    reader.take(window.len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_no_windows_for_empty_file() {
        let mut rng = rand::rng();
        assert!(choose_windows(0, 5, 64, &mut rng).is_empty());
        assert!(choose_windows(100, 0, 64, &mut rng).is_empty());
        assert!(choose_windows(100, 5, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_window_clipped_to_small_file() {
        let mut rng = rand::rng();
        let windows = choose_windows(10, 3, 64, &mut rng);
        assert_eq!(windows.len(), 3);
        for w in windows {
            assert_eq!(w.offset, 0);
            assert_eq!(w.len, 10);
        }
    }

    #[test]
    fn test_capture_across_chunk_boundaries() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let windows = vec![
            SampleWindow { offset: 95, len: 20 },
            SampleWindow { offset: 0, len: 5 },
            SampleWindow { offset: 990, len: 10 },
            SampleWindow { offset: 95, len: 20 },
        ];
        let mut capture = SampleCapture::new(windows.clone());

        for (i, chunk) in data.chunks(100).enumerate() {
            capture.feed((i * 100) as u64, chunk);
        }

        capture.ensure_complete(1).unwrap();
        for (i, w) in windows.iter().enumerate() {
            let start = w.offset as usize;
            assert_eq!(capture.expected[i], data[start..start + w.len]);
        }

        let result = capture.verify(&mut Cursor::new(data), 1).unwrap();
        assert_eq!(result.samples.len(), 4);
        assert!(result.passed());
    }

    #[test]
    fn test_incomplete_capture_detected() {
        let mut capture = SampleCapture::new(vec![SampleWindow { offset: 50, len: 100 }]);
        capture.feed(0, &[1u8; 100]);

        let err = capture.ensure_complete(2).unwrap_err();
        assert!(matches!(err, ShredError::CaptureIncomplete { pass: 2, sample: 1 }));
    }

    #[test]
    fn test_mismatch_reported() {
        let written = vec![0xAAu8; 256];
        let mut capture = SampleCapture::new(vec![
            SampleWindow { offset: 0, len: 16 },
            SampleWindow { offset: 128, len: 16 },
        ]);
        capture.feed(0, &written);

        let mut on_disk = written.clone();
        on_disk[130] = 0x00;

        let err = capture.verify(&mut Cursor::new(on_disk), 3).unwrap_err();
        assert!(matches!(
            err,
            ShredError::Verification { pass: 3, sample: 2, offset: 128 }
        ));
    }

    #[test]
    fn test_short_read_is_mismatch() {
        let mut capture = SampleCapture::new(vec![SampleWindow { offset: 90, len: 10 }]);
        capture.feed(0, &[5u8; 100]);

        let err = capture.verify(&mut Cursor::new(vec![5u8; 95]), 1).unwrap_err();
        assert!(matches!(err, ShredError::Verification { .. }));
    }

    #[test]
    fn test_summary_aggregation() {
        let window = SampleWindow { offset: 0, len: 1 };
        let summary = VerificationSummary {
            passes: vec![
                PassVerification { pass: 1, samples: vec![SampleResult { window, matched: true }; 5] },
                PassVerification { pass: 2, samples: vec![SampleResult { window, matched: true }; 5] },
            ],
        };
        assert!(summary.passed());
        assert_eq!(summary.comparisons(), 10);
        assert!(VerificationSummary::default().passed());
    }
}
