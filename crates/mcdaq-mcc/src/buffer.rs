//! Demultiplexed sample storage.
//!
//! One fixed-capacity set of parallel arrays, sized once at acquisition
//! start and zeroed on stop. Each slot mirrors one position of the
//! board's circular buffer, retagged with the channel and logical
//! sample-group index the walk assigned to it.

use mcdaq_core::READ_CHANNELS_PER_GROUP;

/// One demultiplexed slot of the sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSlot {
    /// Logical multi-channel sample number (`slot_write_count / 8`).
    pub sequence_index: u64,
    /// Channel within the group (`slot_write_count % 8`).
    pub channel: u16,
    pub raw_value: u16,
}

/// Fixed-capacity storage for demultiplexed samples.
///
/// The walk stores every channel of a group here, including channels
/// outside the configured `save_channels` subset; suppression of
/// unmonitored channels is deferred to downstream consumers.
#[derive(Debug)]
pub struct SampleBuffer {
    sequence_indexes: Box<[u64]>,
    values: Box<[u16]>,
    channels: Box<[u16]>,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            sequence_indexes: vec![0; capacity].into_boxed_slice(),
            values: vec![0; capacity].into_boxed_slice(),
            channels: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Zero every slot, e.g. when acquisition stops.
    pub fn zero(&mut self) {
        self.sequence_indexes.fill(0);
        self.values.fill(0);
        self.channels.fill(0);
    }

    /// Store one demultiplexed sample at a physical slot position.
    pub fn record(&mut self, slot: usize, raw_value: u16, channel: u16, sequence_index: u64) {
        self.sequence_indexes[slot] = sequence_index;
        self.values[slot] = raw_value;
        self.channels[slot] = channel;
    }

    /// Read back one slot.
    pub fn slot(&self, index: usize) -> SampleSlot {
        SampleSlot {
            sequence_index: self.sequence_indexes[index],
            channel: self.channels[index],
            raw_value: self.values[index],
        }
    }

    /// Sequence index stored at a slot.
    pub fn sequence_at(&self, index: usize) -> u64 {
        self.sequence_indexes[index]
    }

    /// The full group of raw values starting at a group's first slot.
    ///
    /// Groups never straddle the wrap boundary because the capacity is
    /// a multiple of the group size.
    pub fn group_values(&self, first_slot: usize) -> &[u16] {
        &self.values[first_slot..first_slot + READ_CHANNELS_PER_GROUP]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_read_back() {
        let mut buffer = SampleBuffer::new(16);
        buffer.record(3, 1234, 3, 0);
        assert_eq!(
            buffer.slot(3),
            SampleSlot {
                sequence_index: 0,
                channel: 3,
                raw_value: 1234,
            }
        );
        assert_eq!(buffer.sequence_at(3), 0);
    }

    #[test]
    fn group_values_are_contiguous() {
        let mut buffer = SampleBuffer::new(16);
        for (i, slot) in (8..16).enumerate() {
            buffer.record(slot, 100 + i as u16, i as u16, 1);
        }
        assert_eq!(
            buffer.group_values(8),
            &[100, 101, 102, 103, 104, 105, 106, 107]
        );
    }

    #[test]
    fn zero_clears_all_fields() {
        let mut buffer = SampleBuffer::new(8);
        buffer.record(0, 42, 5, 7);
        buffer.zero();
        assert_eq!(
            buffer.slot(0),
            SampleSlot {
                sequence_index: 0,
                channel: 0,
                raw_value: 0,
            }
        );
    }
}
