//! Re-chunking device frames into fixed-length mono blocks.

/// Folds interleaved device frames to mono and re-chunks them into blocks of
/// a fixed length.
///
/// The block buffer is allocated once in [`new`](Self::new); [`push`](Self::push)
/// never allocates, so it can run inside a device callback.
#[derive(Debug)]
pub struct BlockAssembler {
    block: Vec<f32>,
    filled: usize,
    channels: usize,
}

impl BlockAssembler {
    /// Create an assembler for `block_size`-sample blocks from a device with
    /// `channels` interleaved channels. Both are clamped to at least 1.
    pub fn new(block_size: usize, channels: u16) -> Self {
        Self {
            block: vec![0.0; block_size.max(1)],
            filled: 0,
            channels: usize::from(channels.max(1)),
        }
    }

    /// Block length in samples.
    pub fn block_size(&self) -> usize {
        self.block.len()
    }

    /// Samples waiting for the next full block.
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Feed interleaved frames; `on_block` runs once per completed block.
    ///
    /// Each frame becomes one mono sample (the channel average). A trailing
    /// partial frame is ignored.
    pub fn push(&mut self, interleaved: &[f32], mut on_block: impl FnMut(&mut [f32])) {
        let channels = self.channels;
        for frame in interleaved.chunks_exact(channels) {
            let mono = if channels == 1 {
                frame[0]
            } else {
                frame.iter().sum::<f32>() / channels as f32
            };
            self.block[self.filled] = mono;
            self.filled += 1;
            if self.filled == self.block.len() {
                on_block(&mut self.block[..]);
                self.filled = 0;
            }
        }
    }

    /// Discard any partial block.
    pub fn reset(&mut self) {
        self.filled = 0;
    }
}

/// Copy each mono sample to every channel of an interleaved output buffer.
///
/// Writes `min(mono.len(), output.len() / channels)` frames and zeroes the
/// rest of `output`.
pub fn expand_mono(mono: &[f32], output: &mut [f32], channels: u16) {
    let channels = usize::from(channels.max(1));
    let mut written = 0;
    for (frame, &sample) in output.chunks_exact_mut(channels).zip(mono) {
        frame.fill(sample);
        written += channels;
    }
    output[written..].fill(0.0);
}
