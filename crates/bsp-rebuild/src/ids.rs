//! Output identifier allocation.

/// Hands out the `id` values of emitted solids and sides.
///
/// One allocator is shared by every module that writes geometry during a
/// run, so IDs stay unique across the whole output. Solid and side IDs are
/// independent sequences. Candidates that end up skipped never take an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_solid: u32,
    next_side: u32,
}

impl IdAllocator {
    /// First ID handed out by each sequence.
    pub const FIRST_ID: u32 = 1;

    /// Creates an allocator with both sequences at [`Self::FIRST_ID`].
    pub fn new() -> Self {
        Self {
            next_solid: Self::FIRST_ID,
            next_side: Self::FIRST_ID,
        }
    }

    /// Returns the next solid ID.
    pub fn next_solid_id(&mut self) -> u32 {
        let id = self.next_solid;
        self.next_solid += 1;
        id
    }

    /// Returns the next side ID.
    pub fn next_side_id(&mut self) -> u32 {
        let id = self.next_side;
        self.next_side += 1;
        id
    }

    /// Number of solid IDs handed out so far.
    pub fn solids_allocated(&self) -> u32 {
        self.next_solid - Self::FIRST_ID
    }

    /// Number of side IDs handed out so far.
    pub fn sides_allocated(&self) -> u32 {
        self.next_side - Self::FIRST_ID
    }

    /// Restarts both sequences, for a new run.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_independent() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_solid_id(), 1);
        assert_eq!(ids.next_side_id(), 1);
        assert_eq!(ids.next_side_id(), 2);
        assert_eq!(ids.next_solid_id(), 2);
        assert_eq!(ids.solids_allocated(), 2);
        assert_eq!(ids.sides_allocated(), 2);
    }

    #[test]
    fn reset_restarts_both() {
        let mut ids = IdAllocator::new();
        ids.next_solid_id();
        ids.next_side_id();
        ids.reset();
        assert_eq!(ids, IdAllocator::default());
        assert_eq!(ids.next_solid_id(), 1);
    }
}
