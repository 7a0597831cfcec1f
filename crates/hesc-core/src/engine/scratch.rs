/// Absolute state of one decoded atom in wire units (milli-Angstrom, centi-B).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtomState {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub b: i32,
}

impl AtomState {
    /// Applies a coordinate delta and a B-factor delta, wrapping on overflow.
    pub fn offset(self, dx: i32, dy: i32, dz: i32, db: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z.wrapping_add(dz),
            b: self.b.wrapping_add(db),
        }
    }
}

/// Per-group slots holding the atoms decoded so far, indexed by position in the template.
///
/// The arena only grows. Slots beyond the current group keep stale values, which is
/// harmless because bond tables can only point at atoms decoded earlier in the same group.
#[derive(Debug, Default)]
pub struct ScratchArena {
    slots: Vec<AtomState>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(atoms: usize) -> Self {
        Self {
            slots: vec![AtomState::default(); atoms],
        }
    }

    /// Makes sure at least `atoms` slots exist.
    pub fn ensure(&mut self, atoms: usize) {
        if atoms > self.slots.len() {
            self.slots.resize(atoms, AtomState::default());
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<AtomState> {
        self.slots.get(index).copied()
    }

    pub fn set(&mut self, index: usize, state: AtomState) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_wraps_instead_of_overflowing() {
        let state = AtomState {
            x: i32::MAX,
            y: 0,
            z: -5,
            b: 100,
        };
        let next = state.offset(1, -2, 5, -100);
        assert_eq!(next.x, i32::MIN);
        assert_eq!(next.y, -2);
        assert_eq!(next.z, 0);
        assert_eq!(next.b, 0);
    }

    #[test]
    fn ensure_grows_but_never_shrinks() {
        let mut arena = ScratchArena::with_capacity(4);
        arena.ensure(2);
        assert_eq!(arena.capacity(), 4);
        arena.ensure(10);
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn slots_keep_values_until_overwritten() {
        let mut arena = ScratchArena::new();
        arena.ensure(3);
        let state = AtomState {
            x: 1,
            y: 2,
            z: 3,
            b: 4,
        };
        arena.set(1, state);
        arena.ensure(8);
        assert_eq!(arena.get(1), Some(state));
        assert_eq!(arena.get(0), Some(AtomState::default()));
        assert_eq!(arena.get(8), None);
    }
}
