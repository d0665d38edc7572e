use arrayvec::ArrayVec;

use crate::ChannelSet;

/// Upper bound on channels handed to the processor in one block.
pub const MAX_CHANNELS: usize = 8;

/// Non-interleaved audio buffer used by offline hosts and tests.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, block_size: usize) -> Self {
        let num_channels = num_channels.min(MAX_CHANNELS);
        let channels = (0..num_channels).map(|_| vec![0.0; block_size]).collect();
        Self { channels }
    }

    pub fn for_layout(output: ChannelSet, block_size: usize) -> Self {
        Self::new(output.channels(), block_size)
    }

    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels
            .first()
            .map(|channel| channel.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Shrinks or grows every channel to `frames`, zero-filling new samples.
    pub fn set_len(&mut self, frames: usize) {
        for channel in &mut self.channels {
            channel.resize(frames, 0.0);
        }
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    /// Borrowed channel slices in the shape the processor expects.
    pub fn slices_mut(&mut self) -> ArrayVec<&mut [f32], MAX_CHANNELS> {
        self.channels
            .iter_mut()
            .map(|channel| channel.as_mut_slice())
            .collect()
    }

    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|channel| channel.iter())
            .fold(0.0_f32, |acc, sample| acc.max(sample.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_from_layout() {
        let mut buffer = AudioBuffer::for_layout(ChannelSet::Stereo, 64);
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.len(), 64);

        buffer.slices_mut()[1][3] = -0.5;
        assert_eq!(buffer.peak(), 0.5);
        buffer.clear();
        assert_eq!(buffer.peak(), 0.0);

        buffer.set_len(16);
        assert_eq!(buffer.channel(0).map(<[f32]>::len), Some(16));
    }
}
