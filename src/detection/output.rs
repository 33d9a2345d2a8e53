use crate::error::LauncherError;

/// Which pipe of the detector a chunk was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Decoded detector output for the current run.
///
/// Chunks arrive as raw bytes and may end in the middle of a multi-byte
/// character; those trailing bytes are held back, per stream, until the next
/// chunk from the same stream.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    text: String,
    pending_stdout: Vec<u8>,
    pending_stderr: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Throw away everything and show `text` instead.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.pending_stdout.clear();
        self.pending_stderr.clear();
    }

    fn pending_mut(&mut self, stream: OutputStream) -> &mut Vec<u8> {
        match stream {
            OutputStream::Stdout => &mut self.pending_stdout,
            OutputStream::Stderr => &mut self.pending_stderr,
        }
    }

    /// Decode `chunk` read from `stream` and append it. Returns the number of
    /// bytes of text added.
    ///
    /// On invalid UTF-8 nothing is appended and the stream's held-back bytes
    /// are dropped.
    pub fn push_bytes(
        &mut self,
        stream: OutputStream,
        chunk: &[u8],
    ) -> Result<usize, LauncherError> {
        let mut bytes = std::mem::take(self.pending_mut(stream));
        bytes.extend_from_slice(chunk);

        let (valid, rest) = match std::str::from_utf8(&bytes) {
            Ok(text) => (text, &[][..]),
            // Incomplete sequence at the very end, wait for more bytes.
            Err(e) if e.error_len().is_none() => {
                let (head, tail) = bytes.split_at(e.valid_up_to());
                let head = std::str::from_utf8(head).map_err(|e| LauncherError::Decode {
                    valid_up_to: e.valid_up_to(),
                })?;
                (head, tail)
            }
            Err(e) => {
                return Err(LauncherError::Decode {
                    valid_up_to: e.valid_up_to(),
                });
            }
        };

        self.text.push_str(valid);
        let added = valid.len();
        *self.pending_mut(stream) = rest.to_vec();
        Ok(added)
    }

    /// The detector is done writing. Bytes still held back can never become
    /// text any more, so they are an error; either way nothing stays pending.
    pub fn finish(&mut self) -> Result<(), LauncherError> {
        let pending = self.pending_stdout.len() + self.pending_stderr.len();
        self.pending_stdout.clear();
        self.pending_stderr.clear();
        if pending > 0 {
            return Err(LauncherError::Truncated { pending });
        }
        Ok(())
    }
}
