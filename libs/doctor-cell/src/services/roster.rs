use uuid::Uuid;

use crate::models::AvailabilitySlot;

/// Working copy of one doctor's availability, loaded from the store.
///
/// Mutations apply to the copy first; the caller then persists and, if the
/// store rejects the write, restores the snapshot taken beforehand. The
/// post-mutation roster is handed back to the dashboard so it can render
/// without a refetch.
#[derive(Debug, Clone)]
pub struct SlotRoster {
    doctor_id: i64,
    slots: Vec<AvailabilitySlot>,
}

impl SlotRoster {
    pub fn new(doctor_id: i64, slots: Vec<AvailabilitySlot>) -> Self {
        let mut roster = Self { doctor_id, slots };
        roster.sort();
        roster
    }

    pub fn doctor_id(&self) -> i64 {
        self.doctor_id
    }

    pub fn slots(&self) -> &[AvailabilitySlot] {
        &self.slots
    }

    pub fn snapshot(&self) -> Vec<AvailabilitySlot> {
        self.slots.clone()
    }

    pub fn restore(&mut self, snapshot: Vec<AvailabilitySlot>) {
        self.slots = snapshot;
    }

    pub fn insert(&mut self, slot: AvailabilitySlot) {
        self.slots.push(slot);
        self.sort();
    }

    pub fn remove(&mut self, slot_id: Uuid) -> Option<AvailabilitySlot> {
        let position = self.slots.iter().position(|slot| slot.id == slot_id)?;
        Some(self.slots.remove(position))
    }

    pub fn set_available(&mut self, slot_id: Uuid, is_available: bool) -> Option<AvailabilitySlot> {
        let slot = self.slots.iter_mut().find(|slot| slot.id == slot_id)?;
        slot.is_available = is_available;
        Some(slot.clone())
    }

    /// Replace a slot with the representation the store returned.
    pub fn replace(&mut self, slot: AvailabilitySlot) {
        self.remove(slot.id);
        self.insert(slot);
    }

    pub fn into_slots(self) -> Vec<AvailabilitySlot> {
        self.slots
    }

    fn sort(&mut self) {
        self.slots
            .sort_by(|a, b| (a.day_of_week, a.start_time).cmp(&(b.day_of_week, b.start_time)));
    }
}
