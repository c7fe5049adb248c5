//! Per-path register file.
//!
//! A [`MethodState`] maps register indices to shared [`HeapItem`]s. It is backed by
//! `imbl::HashMap`, so [`fork`](MethodState::fork) is O(1): the fork shares the map
//! structure with its parent until one of them writes, and unwritten registers keep
//! pointing at the very same item.
//!
//! Wide values (`long`, `double`) are stored in their low register.

use std::sync::Arc;

use imbl::HashMap as ImHashMap;

use crate::{emulation::HeapItem, ExecutionError};

/// Register file of one exploration path through a method.
///
/// # Examples
///
/// ```rust
/// use dexscope::emulation::{HeapItem, MethodState};
///
/// let mut state = MethodState::new(4);
/// state.assign_register(0, HeapItem::int(1))?;
///
/// let mut fork = state.fork();
/// fork.assign_register(0, HeapItem::int(2))?;
///
/// assert_eq!(*state.read_register(0)?, HeapItem::int(1));
/// assert_eq!(*fork.read_register(0)?, HeapItem::int(2));
/// # Ok::<(), dexscope::ExecutionError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MethodState {
    registers: ImHashMap<u16, Arc<HeapItem>>,
    register_count: u16,
}

impl MethodState {
    /// Creates an empty state for a method with `register_count` registers.
    #[must_use]
    pub fn new(register_count: u16) -> Self {
        MethodState {
            registers: ImHashMap::new(),
            register_count,
        }
    }

    /// Number of registers of the method.
    #[must_use]
    pub fn register_count(&self) -> u16 {
        self.register_count
    }

    fn check_bounds(&self, register: u16) -> Result<(), ExecutionError> {
        if register >= self.register_count {
            return Err(ExecutionError::RegisterOutOfBounds {
                register,
                count: self.register_count,
            });
        }
        Ok(())
    }

    /// Reads a register.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::RegisterOutOfBounds`] for an index beyond the register
    /// count and [`ExecutionError::UnassignedRegister`] if nothing was assigned yet.
    pub fn read_register(&self, register: u16) -> Result<Arc<HeapItem>, ExecutionError> {
        self.check_bounds(register)?;
        self.registers
            .get(&register)
            .cloned()
            .ok_or(ExecutionError::UnassignedRegister { register })
    }

    /// Assigns a fresh item to a register, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::RegisterOutOfBounds`] for an index beyond the register count.
    pub fn assign_register(&mut self, register: u16, item: HeapItem) -> Result<(), ExecutionError> {
        self.check_bounds(register)?;
        self.registers.insert(register, Arc::new(item));
        Ok(())
    }

    /// Returns `true` if the register holds an item.
    #[must_use]
    pub fn is_assigned(&self, register: u16) -> bool {
        self.registers.contains_key(&register)
    }

    /// All assigned register indices in ascending order.
    #[must_use]
    pub fn assigned_registers(&self) -> Vec<u16> {
        let mut registers: Vec<u16> = self.registers.keys().copied().collect();
        registers.sort_unstable();
        registers
    }

    /// Creates an independent copy for a diverging exploration path.
    ///
    /// Writes to either state are invisible to the other.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_unassigned() {
        let state = MethodState::new(2);
        assert_eq!(
            state.read_register(1).unwrap_err(),
            ExecutionError::UnassignedRegister { register: 1 }
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let mut state = MethodState::new(2);
        assert_eq!(
            state.read_register(2).unwrap_err(),
            ExecutionError::RegisterOutOfBounds {
                register: 2,
                count: 2
            }
        );
        assert!(state.assign_register(5, HeapItem::int(0)).is_err());
        assert!(!state.is_assigned(5));
    }

    #[test]
    fn test_assign_overwrites() {
        let mut state = MethodState::new(1);
        state.assign_register(0, HeapItem::int(1)).unwrap();
        state.assign_register(0, HeapItem::long(2)).unwrap();
        assert_eq!(*state.read_register(0).unwrap(), HeapItem::long(2));
        assert_eq!(state.assigned_registers(), vec![0]);
    }

    #[test]
    fn test_fork_is_independent() {
        let mut parent = MethodState::new(3);
        parent.assign_register(0, HeapItem::int(1)).unwrap();
        parent.assign_register(1, HeapItem::int(2)).unwrap();

        let mut child = parent.fork();
        child.assign_register(1, HeapItem::int(20)).unwrap();
        child.assign_register(2, HeapItem::int(30)).unwrap();

        assert_eq!(*parent.read_register(1).unwrap(), HeapItem::int(2));
        assert!(!parent.is_assigned(2));
        assert_eq!(parent.assigned_registers(), vec![0, 1]);
        assert_eq!(child.assigned_registers(), vec![0, 1, 2]);

        parent.assign_register(0, HeapItem::int(-1)).unwrap();
        assert_eq!(*child.read_register(0).unwrap(), HeapItem::int(1));
    }

    #[test]
    fn test_fork_shares_unwritten_items() {
        let mut parent = MethodState::new(1);
        parent.assign_register(0, HeapItem::unknown("int")).unwrap();

        let child = parent.fork();
        let a = parent.read_register(0).unwrap();
        let b = child.read_register(0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
