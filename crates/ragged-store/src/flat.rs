//! Fixed-step growable flat storage shared by all three store buffers.
//!
//! A [`FlatBuffer`] is a pre-sized `Vec<u32>` with a cursor marking how
//! many words are in use. It grows by whole blocks of `step` words, never
//! by doubling, so memory overhead stays bounded by one block.

/// A contiguous run of 32-bit words with explicit, block-wise growth.
///
/// The backing vector's length *is* the capacity; words past the cursor
/// are allocated but unused. Any mutable borrow of the contents ends
/// before the next growth, since growth may relocate the allocation.
#[derive(Clone, Debug)]
pub struct FlatBuffer {
    /// Backing storage. Allocated to full capacity, zero-initialised.
    words: Vec<u32>,
    /// Number of words in use.
    len: usize,
    /// Growth block size in words.
    step: usize,
    /// Name used in log output.
    name: &'static str,
    /// Number of reallocations so far.
    growths: u64,
}

impl FlatBuffer {
    /// Create an empty buffer with `capacity` zeroed words.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn new(name: &'static str, capacity: usize, step: usize) -> Self {
        assert!(step > 0, "{name} buffer growth step must be non-zero");
        Self {
            words: vec![0; capacity],
            len: 0,
            step,
            name,
            growths: 0,
        }
    }

    /// Ensure at least `min_free` unused words follow the cursor.
    ///
    /// When the remaining capacity is short, the buffer is reallocated to
    /// `capacity + ceil(min_free / step) * step` words and the existing
    /// contents are carried over. Returns whether a reallocation happened.
    pub fn grow(&mut self, min_free: usize) -> bool {
        if self.remaining() >= min_free {
            return false;
        }
        let old_capacity = self.capacity();
        let new_capacity = old_capacity + min_free.div_ceil(self.step) * self.step;
        self.words.reserve_exact(new_capacity - old_capacity);
        self.words.resize(new_capacity, 0);
        self.growths += 1;
        log::debug!(
            "{} buffer grew from {} to {} words ({} in use)",
            self.name,
            old_capacity,
            new_capacity,
            self.len
        );
        true
    }

    /// Move the cursor to `len`.
    ///
    /// Words newly brought into use are zeroed. Shrinking leaves the
    /// abandoned words in place; they are overwritten on reuse.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the capacity.
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.capacity(),
            "{} buffer length {len} exceeds capacity {}",
            self.name,
            self.capacity()
        );
        if len > self.len {
            self.words[self.len..len].fill(0);
        }
        self.len = len;
    }

    /// Append one word, growing if needed.
    pub fn push(&mut self, word: u32) {
        self.grow(1);
        self.words[self.len] = word;
        self.len += 1;
    }

    /// Append `count` copies of `word`, growing at most once.
    pub fn push_n(&mut self, count: usize, word: u32) {
        self.grow(count);
        self.words[self.len..self.len + count].fill(word);
        self.len += count;
    }

    /// Insert `word` at `at`, shifting everything from `at` one place right.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    pub fn insert(&mut self, at: usize, word: u32) {
        assert!(at <= self.len, "{} insert at {at} past end {}", self.name, self.len);
        self.grow(1);
        self.words.copy_within(at..self.len, at + 1);
        self.words[at] = word;
        self.len += 1;
    }

    /// Remove the word at `at`, shifting everything after it one place left.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`.
    pub fn remove(&mut self, at: usize) -> u32 {
        assert!(at < self.len, "{} remove at {at} past end {}", self.name, self.len);
        let word = self.words[at];
        self.words.copy_within(at + 1..self.len, at);
        self.len -= 1;
        word
    }

    /// Copy `count` words from `from` to `to` with memmove semantics.
    ///
    /// Source and destination may overlap in either direction; the copy
    /// order is chosen so that no source word is clobbered before it is
    /// read. The destination may extend past the cursor but not past the
    /// capacity.
    ///
    /// # Panics
    ///
    /// Panics if either range exceeds the capacity.
    pub fn copy_within(&mut self, from: usize, to: usize, count: usize) {
        if count == 0 || from == to {
            return;
        }
        // `slice::copy_within` is memmove: it picks the direction from
        // the relative position of source and destination.
        self.words.copy_within(from..from + count, to);
    }

    /// Overwrite `count` words starting at `start` with `word`.
    pub fn fill(&mut self, start: usize, count: usize, word: u32) {
        self.words[start..start + count].fill(word);
    }

    /// Add `delta` to every in-use word from `start` onwards.
    pub fn add_from(&mut self, start: usize, delta: u32) {
        for w in &mut self.words[start..self.len] {
            *w += delta;
        }
    }

    /// Read the word at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`.
    #[inline]
    pub fn get(&self, at: usize) -> u32 {
        self.as_slice()[at]
    }

    /// Write the word at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`.
    #[inline]
    pub fn set(&mut self, at: usize, word: u32) {
        self.as_mut_slice()[at] = word;
    }

    /// The in-use words.
    pub fn as_slice(&self) -> &[u32] {
        &self.words[..self.len]
    }

    /// The in-use words, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.words[..self.len]
    }

    /// Number of words in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no words are in use.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total capacity in words.
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Unused capacity in words.
    pub fn remaining(&self) -> usize {
        self.words.len() - self.len
    }

    /// Number of reallocations performed so far.
    pub fn growths(&self) -> u64 {
        self.growths
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty_with_capacity() {
        let buf = FlatBuffer::new("test", 8, 4);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.remaining(), 8);
        assert_eq!(buf.memory_bytes(), 32);
    }

    #[test]
    fn grow_is_noop_when_space_suffices() {
        let mut buf = FlatBuffer::new("test", 8, 4);
        assert!(!buf.grow(8));
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.growths(), 0);
    }

    #[test]
    fn grow_adds_whole_blocks() {
        let mut buf = FlatBuffer::new("test", 8, 4);
        buf.set_len(6);
        // 2 free, 5 requested: ceil(5 / 4) = 2 blocks.
        assert!(buf.grow(5));
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.growths(), 1);
    }

    #[test]
    fn grow_preserves_contents() {
        let mut buf = FlatBuffer::new("test", 2, 3);
        buf.push(7);
        buf.push(8);
        buf.push(9);
        assert_eq!(buf.as_slice(), &[7, 8, 9]);
        assert_eq!(buf.capacity(), 5);
    }

    #[test]
    fn set_len_zeroes_reclaimed_words() {
        let mut buf = FlatBuffer::new("test", 4, 4);
        buf.push_n(3, 5);
        buf.set_len(1);
        buf.set_len(3);
        assert_eq!(buf.as_slice(), &[5, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "exceeds capacity")]
    fn set_len_past_capacity_panics() {
        let mut buf = FlatBuffer::new("test", 4, 4);
        buf.set_len(5);
    }

    #[test]
    fn insert_and_remove_shift_neighbours() {
        let mut buf = FlatBuffer::new("test", 0, 2);
        for w in [1, 2, 4] {
            buf.push(w);
        }
        buf.insert(2, 3);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(buf.remove(0), 1);
        assert_eq!(buf.as_slice(), &[2, 3, 4]);
        buf.insert(3, 5);
        assert_eq!(buf.as_slice(), &[2, 3, 4, 5]);
    }

    #[test]
    fn overlapping_right_shift_keeps_data() {
        let mut buf = FlatBuffer::new("test", 10, 10);
        buf.set_len(10);
        for (i, w) in [1, 2, 3, 4, 5].iter().enumerate() {
            buf.set(i, *w);
        }
        buf.copy_within(0, 2, 5);
        assert_eq!(&buf.as_slice()[2..7], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn overlapping_left_shift_keeps_data() {
        let mut buf = FlatBuffer::new("test", 10, 10);
        buf.set_len(10);
        for i in 0..10 {
            buf.set(i, i as u32);
        }
        buf.copy_within(3, 1, 6);
        assert_eq!(&buf.as_slice()[1..7], &[3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn add_from_offsets_tail() {
        let mut buf = FlatBuffer::new("test", 4, 4);
        for w in [0, 10, 20, 30] {
            buf.push(w);
        }
        buf.add_from(2, 5);
        assert_eq!(buf.as_slice(), &[0, 10, 25, 35]);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn copy_within_matches_vec_memmove(
                words in proptest::collection::vec(0u32..1000, 1..64),
                from_frac in 0.0f64..1.0,
                to_frac in 0.0f64..1.0,
                count_frac in 0.0f64..1.0,
            ) {
                let n = words.len();
                let from = ((n as f64) * from_frac) as usize % n;
                let to = ((n as f64) * to_frac) as usize % n;
                let max_count = n - from.max(to);
                let count = ((max_count as f64) * count_frac) as usize;

                let mut buf = FlatBuffer::new("prop", 0, 16);
                for &w in &words {
                    buf.push(w);
                }
                buf.copy_within(from, to, count);

                let mut expected = words.clone();
                expected.copy_within(from..from + count, to);
                prop_assert_eq!(buf.as_slice(), expected.as_slice());
            }

            #[test]
            fn capacity_never_exceeds_one_block_of_slack(
                pushes in 1usize..500,
                step in 1usize..64,
            ) {
                let mut buf = FlatBuffer::new("prop", 0, step);
                for i in 0..pushes {
                    buf.push(i as u32);
                }
                prop_assert!(buf.capacity() >= buf.len());
                prop_assert!(buf.capacity() - buf.len() < step);
            }
        }
    }
}
