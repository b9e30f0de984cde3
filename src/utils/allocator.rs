use serde::{Deserialize, Serialize};

/// Index + generation pair preventing stale handles from resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

/// Non-owning handle to a body (or any arena slot). Constraints and vehicles
/// store these instead of references; the arena owns the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub GenerationalId);

impl EntityId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self(GenerationalId { index, generation })
    }

    pub fn from_index(index: u32) -> Self {
        Self::new(index as usize, 0)
    }

    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }

    pub fn is_null(&self) -> bool {
        self.0.index == usize::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new(usize::MAX, 0)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena handing out stable [`EntityId`]s.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return EntityId::new(index, slot.generation);
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        EntityId::new(index, 0)
    }

    /// Insert a value that needs to know its own id, e.g. a body storing its
    /// handle.
    pub fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> EntityId {
        if let Some(index) = self.free.pop() {
            let generation = self.slots[index].generation;
            let id = EntityId::new(index, generation);
            self.slots[index].value = Some(build(id));
            return id;
        }
        let id = EntityId::new(self.slots.len(), 0);
        self.slots.push(Slot {
            generation: 0,
            value: Some(build(id)),
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    /// Disjoint mutable access to two slots, used to hand a constraint both of
    /// its bodies at once.
    pub fn get2_mut(&mut self, id_a: EntityId, id_b: EntityId) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() {
            return None;
        }
        self.get(id_a)?;
        self.get(id_b)?;

        let (lo, hi) = if id_a.index() < id_b.index() {
            (id_a.index(), id_b.index())
        } else {
            (id_b.index(), id_a.index())
        };
        let (left, right) = self.slots.split_at_mut(hi);
        let lo_value = left[lo].value.as_mut()?;
        let hi_value = right[0].value.as_mut()?;
        if id_a.index() < id_b.index() {
            Some((lo_value, hi_value))
        } else {
            Some((hi_value, lo_value))
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() || slot.value.is_none() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        slot.value.take()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|_| EntityId::new(index, slot.generation))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
