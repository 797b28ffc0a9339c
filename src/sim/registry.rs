//! Entity registry
//!
//! Owns every live entity, one pool per category. Entities are addressed by
//! `EntityId`, never by reference, so a handle held across a sweep simply
//! stops resolving.
//!
//! Lifecycle within a tick:
//! - additions are queued and only become visible on `commit`
//! - removals only flip the liveness flag; storage is reclaimed on `sweep`
//!
//! Iteration and lookup skip dead entities, so a marked entity disappears
//! from every query immediately.

use serde::{Deserialize, Serialize};

use super::state::{Boss, Enemy, Explosion, MinionBoss, Player, ThreatProjectile, WeaponProjectile};

/// Stable handle to a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Registry categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    Boss,
    MinionBoss,
    Threat,
    Weapon,
    Effect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    id: EntityId,
    alive: bool,
    entity: T,
}

/// Storage for one category (sorted by id for determinism)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    pending: Vec<Slot<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    fn queue(&mut self, id: EntityId, entity: T) {
        self.pending.push(Slot {
            id,
            alive: true,
            entity,
        });
    }

    /// Make queued entities visible. Returns how many were added.
    pub fn commit(&mut self) -> usize {
        let added = self.pending.len();
        // Ids are allocated monotonically, so appending keeps the order
        self.slots.append(&mut self.pending);
        added
    }

    /// Drop dead entities from storage. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.alive);
        before - self.slots.len()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |slot| slot.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.position(id)
            .map(|i| &self.slots[i])
            .filter(|slot| slot.alive)
            .map(|slot| &slot.entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let i = self.position(id)?;
        let slot = &mut self.slots[i];
        if slot.alive { Some(&mut slot.entity) } else { None }
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Flag an entity for removal. Returns false if it was already dead or
    /// unknown, which lets callers count each destruction exactly once.
    pub fn mark_dead(&mut self, id: EntityId) -> bool {
        match self.position(id) {
            Some(i) if self.slots[i].alive => {
                self.slots[i].alive = false;
                true
            }
            _ => false,
        }
    }

    /// Flag every live entity for removal
    pub fn mark_all_dead(&mut self) -> usize {
        let mut marked = 0;
        for slot in self.slots.iter_mut().filter(|s| s.alive) {
            slot.alive = false;
            marked += 1;
        }
        marked
    }

    /// Live entities in id order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .filter(|slot| slot.alive)
            .map(|slot| (slot.id, &slot.entity))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .filter(|slot| slot.alive)
            .map(|slot| (slot.id, &mut slot.entity))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Number of live, committed entities
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of queued, not yet committed entities
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Every entity in the run, partitioned by category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// The single player craft; never swept
    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub bosses: Pool<Boss>,
    pub minions: Pool<MinionBoss>,
    pub threats: Pool<ThreatProjectile>,
    pub weapons: Pool<WeaponProjectile>,
    pub effects: Pool<Explosion>,
    next_id: u32,
}

impl Registry {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Pool::default(),
            bosses: Pool::default(),
            minions: Pool::default(),
            threats: Pool::default(),
            weapons: Pool::default(),
            effects: Pool::default(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = self.allocate_id();
        self.enemies.queue(id, enemy);
        id
    }

    pub fn add_boss(&mut self, boss: Boss) -> EntityId {
        let id = self.allocate_id();
        self.bosses.queue(id, boss);
        id
    }

    pub fn add_minion(&mut self, minion: MinionBoss) -> EntityId {
        let id = self.allocate_id();
        self.minions.queue(id, minion);
        id
    }

    pub fn add_threat(&mut self, threat: ThreatProjectile) -> EntityId {
        let id = self.allocate_id();
        self.threats.queue(id, threat);
        id
    }

    pub fn add_weapon(&mut self, weapon: WeaponProjectile) -> EntityId {
        let id = self.allocate_id();
        self.weapons.queue(id, weapon);
        id
    }

    pub fn add_effect(&mut self, effect: Explosion) -> EntityId {
        let id = self.allocate_id();
        self.effects.queue(id, effect);
        id
    }

    /// Apply queued additions in every category
    pub fn commit(&mut self) -> usize {
        self.enemies.commit()
            + self.bosses.commit()
            + self.minions.commit()
            + self.threats.commit()
            + self.weapons.commit()
            + self.effects.commit()
    }

    /// Reclaim dead entities in every category
    pub fn sweep(&mut self) -> usize {
        self.enemies.sweep()
            + self.bosses.sweep()
            + self.minions.sweep()
            + self.threats.sweep()
            + self.weapons.sweep()
            + self.effects.sweep()
    }

    /// Which category a live id belongs to
    pub fn category_of(&self, id: EntityId) -> Option<Category> {
        if self.enemies.is_alive(id) {
            Some(Category::Enemy)
        } else if self.bosses.is_alive(id) {
            Some(Category::Boss)
        } else if self.minions.is_alive(id) {
            Some(Category::MinionBoss)
        } else if self.threats.is_alive(id) {
            Some(Category::Threat)
        } else if self.weapons.is_alive(id) {
            Some(Category::Weapon)
        } else if self.effects.is_alive(id) {
            Some(Category::Effect)
        } else {
            None
        }
    }

    /// Live entity count across all swept categories (the player excluded)
    pub fn live_count(&self) -> usize {
        self.enemies.len()
            + self.bosses.len()
            + self.minions.len()
            + self.threats.len()
            + self.weapons.len()
            + self.effects.len()
    }
}
