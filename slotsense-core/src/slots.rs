//! Slot registry
//!
//! The authoritative in-memory model of slot occupancy and reservation.
//! Pure state and invariants, no I/O. Mutated only through the two
//! transition operations: the local toggle and the remote reservation.

use log::info;

use crate::error::ReserveError;

/// Occupancy status of one parking slot
///
/// The numeric codes 0/1/2 exist only at the wire-protocol boundary; use
/// [`SlotStatus::code`] and [`SlotStatus::from_code`] there and the variants
/// everywhere else.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotStatus {
    #[default]
    Free = 0,
    Occupied = 1,
    Reserved = 2,
}

impl SlotStatus {
    /// Wire-protocol status code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire-protocol status code
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SlotStatus::Free),
            1 => Some(SlotStatus::Occupied),
            2 => Some(SlotStatus::Reserved),
            _ => None,
        }
    }

    /// Human-readable label for the status display
    pub const fn label(self) -> &'static str {
        match self {
            SlotStatus::Free => "Free",
            SlotStatus::Occupied => "Occupied",
            SlotStatus::Reserved => "Reserved",
        }
    }
}

/// One physical parking space
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    id: u8,
    status: SlotStatus,
    reserved_at_ms: u64,
}

impl Slot {
    /// Stable 1-based identifier
    pub const fn id(&self) -> u8 {
        self.id
    }

    pub const fn status(&self) -> SlotStatus {
        self.status
    }

    /// Start of the current reservation
    ///
    /// `None` unless the slot is currently Reserved. The raw timestamp is
    /// not cleared when a reservation ends, so it must never be read through
    /// any other path.
    pub fn reserved_at_ms(&self) -> Option<u64> {
        match self.status {
            SlotStatus::Reserved => Some(self.reserved_at_ms),
            _ => None,
        }
    }
}

/// Fixed array of N slots, `id = index + 1`
///
/// Created once at startup with every slot Free; never destroyed during
/// normal operation.
#[derive(Debug, Clone)]
pub struct SlotRegistry<const N: usize> {
    slots: [Slot; N],
}

impl<const N: usize> Default for SlotRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SlotRegistry<N> {
    pub fn new() -> Self {
        let mut index = 0u8;
        Self {
            slots: [(); N].map(|()| {
                index += 1;
                Slot {
                    id: index,
                    status: SlotStatus::Free,
                    reserved_at_ms: 0,
                }
            }),
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Bounds-checked slot accessor
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Status of the slot at `index`
    ///
    /// Out-of-range `index` is a programming error in a trusted caller and
    /// panics.
    pub fn status(&self, index: usize) -> SlotStatus {
        assert!(index < N, "slot index {} out of range", index);
        self.slots[index].status
    }

    /// Toggle occupancy from a local select action
    ///
    /// Free and Reserved both toggle to Occupied; Occupied toggles back to
    /// Free. This is the only path that clears a reservation. Returns the
    /// new status. Out-of-range `index` panics.
    pub fn toggle_local(&mut self, index: usize) -> SlotStatus {
        assert!(index < N, "slot index {} out of range", index);
        let slot = &mut self.slots[index];
        slot.status = match slot.status {
            SlotStatus::Free | SlotStatus::Reserved => SlotStatus::Occupied,
            SlotStatus::Occupied => SlotStatus::Free,
        };
        info!("Slot {} status: {}", slot.id, slot.status.label());
        slot.status
    }

    /// Reserve a slot on behalf of a remote request
    ///
    /// `id` is the 1-based external identifier. Only a Free slot can be
    /// reserved; the reservation start time is recorded at the moment of the
    /// transition.
    ///
    /// # Errors
    ///
    /// `ReserveError::InvalidSlotId` if `id` is outside `[1, N]`.
    /// `ReserveError::SlotUnavailable` if the slot is not Free; nothing is
    /// mutated in either case.
    pub fn reserve_remote(&mut self, id: u16, now_ms: u64) -> Result<(), ReserveError> {
        if id < 1 || id as usize > N {
            return Err(ReserveError::InvalidSlotId { id });
        }
        let slot = &mut self.slots[id as usize - 1];
        if slot.status != SlotStatus::Free {
            return Err(ReserveError::SlotUnavailable { id });
        }
        slot.status = SlotStatus::Reserved;
        slot.reserved_at_ms = now_ms;
        info!("Reservation accepted for slot {}", id);
        Ok(())
    }

    /// Immutable copy of all slot statuses for rendering and publishing
    pub fn snapshot(&self) -> [SlotStatus; N] {
        let mut out = [SlotStatus::Free; N];
        for (dst, slot) in out.iter_mut().zip(self.slots.iter()) {
            *dst = slot.status;
        }
        out
    }

    /// Number of slots currently Free
    pub fn free_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.status == SlotStatus::Free)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_is_all_free() {
        let registry = SlotRegistry::<4>::new();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.free_count(), 4);
        for (i, status) in registry.snapshot().iter().enumerate() {
            assert_eq!(*status, SlotStatus::Free);
            assert_eq!(registry.slot(i).unwrap().id(), i as u8 + 1);
        }
    }

    #[test]
    fn toggle_cycles_free_and_occupied() {
        let mut registry = SlotRegistry::<4>::new();
        assert_eq!(registry.toggle_local(0), SlotStatus::Occupied);
        assert_eq!(registry.toggle_local(0), SlotStatus::Free);
        assert_eq!(registry.toggle_local(0), SlotStatus::Occupied);
    }

    #[test]
    fn toggle_clears_reservation() {
        let mut registry = SlotRegistry::<4>::new();
        registry.reserve_remote(2, 1000).unwrap();
        assert_eq!(registry.status(1), SlotStatus::Reserved);

        // Reserved behaves like "occupiable": one toggle parks the car
        assert_eq!(registry.toggle_local(1), SlotStatus::Occupied);
        assert_eq!(registry.toggle_local(1), SlotStatus::Free);
    }

    #[test]
    fn reserve_records_start_time() {
        let mut registry = SlotRegistry::<4>::new();
        registry.reserve_remote(3, 42_000).unwrap();
        assert_eq!(registry.slot(2).unwrap().reserved_at_ms(), Some(42_000));

        // Timestamp is unreadable once the reservation ends
        registry.toggle_local(2);
        assert_eq!(registry.slot(2).unwrap().reserved_at_ms(), None);
    }

    #[test]
    fn reserve_rejects_out_of_range_ids() {
        let mut registry = SlotRegistry::<4>::new();
        assert_eq!(
            registry.reserve_remote(0, 0),
            Err(ReserveError::InvalidSlotId { id: 0 })
        );
        assert_eq!(
            registry.reserve_remote(5, 0),
            Err(ReserveError::InvalidSlotId { id: 5 })
        );
        assert_eq!(registry.free_count(), 4);
    }

    #[test]
    fn reserve_rejects_non_free_slots() {
        let mut registry = SlotRegistry::<4>::new();
        registry.toggle_local(0);
        assert_eq!(
            registry.reserve_remote(1, 0),
            Err(ReserveError::SlotUnavailable { id: 1 })
        );
        assert_eq!(registry.status(0), SlotStatus::Occupied);

        registry.reserve_remote(2, 0).unwrap();
        assert_eq!(
            registry.reserve_remote(2, 0),
            Err(ReserveError::SlotUnavailable { id: 2 })
        );
    }

    #[test]
    fn no_occupied_to_reserved_transition_exists() {
        let mut registry = SlotRegistry::<4>::new();
        registry.toggle_local(0);
        // The only reservation path refuses non-free slots, so
        // Occupied -> Reserved is unreachable
        assert!(registry.reserve_remote(1, 0).is_err());
        assert_eq!(registry.status(0), SlotStatus::Occupied);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut registry = SlotRegistry::<4>::new();
        let before = registry.snapshot();
        registry.toggle_local(0);
        assert_eq!(before[0], SlotStatus::Free);
        assert_eq!(registry.snapshot()[0], SlotStatus::Occupied);
    }

    #[test]
    fn status_codes_match_wire_protocol() {
        assert_eq!(SlotStatus::Free.code(), 0);
        assert_eq!(SlotStatus::Occupied.code(), 1);
        assert_eq!(SlotStatus::Reserved.code(), 2);
        assert_eq!(SlotStatus::from_code(2), Some(SlotStatus::Reserved));
        assert_eq!(SlotStatus::from_code(3), None);
    }
}
