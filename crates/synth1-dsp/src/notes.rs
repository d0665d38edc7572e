pub const MAX_HELD_NOTES: usize = 16;

/// Held-note memory for a monophonic voice with last-note priority.
///
/// Fixed capacity, no allocation. When the stack is full the oldest held
/// note is dropped to make room.
#[derive(Debug, Clone)]
pub struct NoteStack {
    notes: [u8; MAX_HELD_NOTES],
    len: usize,
}

impl Default for NoteStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStack {
    pub const fn new() -> Self {
        Self {
            notes: [0; MAX_HELD_NOTES],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently pressed note that is still held.
    pub fn current(&self) -> Option<u8> {
        self.len.checked_sub(1).map(|top| self.notes[top])
    }

    /// Pushes `note` on top. A note that is already held moves to the top
    /// instead of being stored twice.
    pub fn push(&mut self, note: u8) {
        self.remove(note);
        if self.len == MAX_HELD_NOTES {
            self.notes.copy_within(1.., 0);
            self.len -= 1;
        }
        self.notes[self.len] = note;
        self.len += 1;
    }

    /// Removes `note`; returns whether it was held.
    pub fn remove(&mut self, note: u8) -> bool {
        let Some(index) = self.notes[..self.len].iter().position(|held| *held == note) else {
            return false;
        };
        self.notes.copy_within(index + 1..self.len, index);
        self.len -= 1;
        true
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.notes[..self.len].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_note_wins_and_falls_back() {
        let mut stack = NoteStack::new();
        stack.push(60);
        stack.push(64);
        stack.push(67);
        assert_eq!(stack.current(), Some(67));

        assert!(stack.remove(67));
        assert_eq!(stack.current(), Some(64));

        assert!(stack.remove(60));
        assert_eq!(stack.current(), Some(64));
        assert!(!stack.remove(60));
    }

    #[test]
    fn repeated_note_moves_to_top() {
        let mut stack = NoteStack::new();
        stack.push(60);
        stack.push(62);
        stack.push(60);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec![62, 60]);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut stack = NoteStack::new();
        for note in 0..(MAX_HELD_NOTES as u8 + 2) {
            stack.push(note);
        }
        assert_eq!(stack.len(), MAX_HELD_NOTES);
        assert_eq!(stack.iter().next(), Some(2));
        assert_eq!(stack.current(), Some(MAX_HELD_NOTES as u8 + 1));
    }

    proptest! {
        #[test]
        fn never_holds_duplicates(ops in prop::collection::vec((any::<bool>(), 0u8..24), 1..128)) {
            let mut stack = NoteStack::new();
            for (press, note) in ops {
                if press {
                    stack.push(note);
                    prop_assert_eq!(stack.current(), Some(note));
                } else {
                    stack.remove(note);
                    prop_assert!(stack.iter().all(|held| held != note));
                }
                let mut seen: Vec<u8> = stack.iter().collect();
                seen.sort_unstable();
                seen.dedup();
                prop_assert_eq!(seen.len(), stack.len());
                prop_assert!(stack.len() <= MAX_HELD_NOTES);
            }
        }
    }
}
