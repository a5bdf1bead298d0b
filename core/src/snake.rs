use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Axis-aligned unit step in 4-space. Invalid directions are unrepresentable;
/// raw vectors enter through [`Dir::from_vector`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    XNeg,
    XPos,
    YNeg,
    YPos,
    ZNeg,
    ZPos,
    WNeg,
    WPos,
}

impl Dir {
    pub const fn to_vector(self) -> (i8, i8, i8, i8) {
        match self {
            Self::XNeg => (-1, 0, 0, 0),
            Self::XPos => (1, 0, 0, 0),
            Self::YNeg => (0, -1, 0, 0),
            Self::YPos => (0, 1, 0, 0),
            Self::ZNeg => (0, 0, -1, 0),
            Self::ZPos => (0, 0, 1, 0),
            Self::WNeg => (0, 0, 0, -1),
            Self::WPos => (0, 0, 0, 1),
        }
    }

    pub const fn from_vector(vector: (i8, i8, i8, i8)) -> Option<Self> {
        match vector {
            (-1, 0, 0, 0) => Some(Self::XNeg),
            (1, 0, 0, 0) => Some(Self::XPos),
            (0, -1, 0, 0) => Some(Self::YNeg),
            (0, 1, 0, 0) => Some(Self::YPos),
            (0, 0, -1, 0) => Some(Self::ZNeg),
            (0, 0, 1, 0) => Some(Self::ZPos),
            (0, 0, 0, -1) => Some(Self::WNeg),
            (0, 0, 0, 1) => Some(Self::WPos),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::XNeg => Self::XPos,
            Self::XPos => Self::XNeg,
            Self::YNeg => Self::YPos,
            Self::YPos => Self::YNeg,
            Self::ZNeg => Self::ZPos,
            Self::ZPos => Self::ZNeg,
            Self::WNeg => Self::WPos,
            Self::WPos => Self::WNeg,
        }
    }

    pub const fn all() -> [Self; 8] {
        [
            Self::XNeg,
            Self::XPos,
            Self::YNeg,
            Self::YPos,
            Self::ZNeg,
            Self::ZPos,
            Self::WNeg,
            Self::WPos,
        ]
    }
}

/// `Paused ⇄ Running` is driven by the shell; `Lost` is terminal until a
/// reset.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldState {
    Paused,
    Running,
    Lost,
}

impl WorldState {
    pub const fn is_lost(self) -> bool {
        matches!(self, Self::Lost)
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::Paused
    }
}

/// Toroidal 4-dimensional snake world, advanced by an external fixed-period
/// driver (see [`SNAKE_TICK_PERIOD`]).
#[derive(Clone, Debug)]
pub struct SnakeWorld {
    size: Coord,
    body: VecDeque<Coord4>,
    occupied: HashSet<Coord4>,
    food: Coord4,
    direction: Dir,
    score: u32,
    state: WorldState,
    rng: SmallRng,
}

impl SnakeWorld {
    pub fn new(size: Coord, seed: u64) -> Self {
        let center = size / 2;
        let start = (center, center, center, center);

        let mut body = VecDeque::new();
        body.push_back(start);
        let mut occupied = HashSet::new();
        occupied.insert(start);

        let mut world = Self {
            size,
            body,
            occupied,
            food: start,
            direction: Dir::XPos,
            score: 0,
            state: Default::default(),
            rng: SmallRng::seed_from_u64(seed),
        };
        world.place_food();
        world
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn head(&self) -> Coord4 {
        *self.body.front().expect("body is never empty")
    }

    /// Body segments, head first.
    pub fn body(&self) -> impl Iterator<Item = Coord4> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn food(&self) -> Coord4 {
        self.food
    }

    pub fn direction(&self) -> Dir {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> WorldState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, WorldState::Paused)
    }

    pub fn is_lost(&self) -> bool {
        self.state.is_lost()
    }

    /// Store the direction applied at the next tick; between ticks the last
    /// accepted write wins. Reversals into the neck and input after a loss
    /// are rejected. Returns whether the input was accepted, so the shell
    /// can drive its unpause policy off it.
    pub fn set_direction(&mut self, direction: Dir) -> bool {
        if self.state.is_lost() || direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn pause(&mut self) {
        if matches!(self.state, WorldState::Running) {
            self.state = WorldState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if matches!(self.state, WorldState::Paused) {
            self.state = WorldState::Running;
        }
    }

    /// Advance one step: wrap the head toroidally, then settle collision,
    /// growth, or plain movement. Paused and lost worlds do not move.
    pub fn tick(&mut self) -> TickOutcome {
        use TickOutcome::*;

        if !matches!(self.state, WorldState::Running) {
            return NoChange;
        }

        let new_head = wrap(self.head(), self.direction.to_vector(), self.size);

        // the tail counts: it has not moved out of the way yet
        if self.occupied.contains(&new_head) {
            self.state = WorldState::Lost;
            log::debug!("snake collided with itself at {:?}", new_head);
            return Died;
        }

        self.body.push_front(new_head);
        self.occupied.insert(new_head);

        if new_head == self.food {
            self.score += 1;
            self.place_food();
            Ate
        } else {
            let tail = self.body.pop_back().expect("body has at least the new head");
            self.occupied.remove(&tail);
            Moved
        }
    }

    /// Back to the creation state: one segment at the center, heading `+x`,
    /// paused, score cleared. The RNG keeps its stream so the new food does
    /// not replay the previous game's sequence.
    pub fn reset(&mut self) {
        let center = self.size / 2;
        let start = (center, center, center, center);

        self.body.clear();
        self.body.push_back(start);
        self.occupied.clear();
        self.occupied.insert(start);
        self.direction = Dir::XPos;
        self.score = 0;
        self.state = WorldState::Paused;
        self.place_food();
    }

    /// Draw random coordinates until one misses the body. With a full grid
    /// there is no valid target and the previous food stays put.
    fn place_food(&mut self) {
        if self.occupied.len() >= usize::from(total_cells(self.size)) {
            log::warn!("no free cell left for food, body fills the grid");
            return;
        }

        loop {
            let candidate = (
                self.rng.random_range(0..self.size),
                self.rng.random_range(0..self.size),
                self.rng.random_range(0..self.size),
                self.rng.random_range(0..self.size),
            );
            if !self.occupied.contains(&candidate) {
                log::trace!("food placed at {:?}", candidate);
                self.food = candidate;
                return;
            }
        }
    }

    /// Immutable render model for the shell.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            size: self.size,
            body: self.body.iter().copied().collect(),
            food: self.food,
            score: self.score,
            paused: self.is_paused(),
            lost: self.is_lost(),
        }
    }

    #[cfg(test)]
    fn from_parts(size: Coord, segments: &[Coord4], food: Coord4, direction: Dir) -> Self {
        Self {
            size,
            body: segments.iter().copied().collect(),
            occupied: segments.iter().copied().collect(),
            food,
            direction,
            score: 0,
            state: WorldState::Running,
            rng: SmallRng::seed_from_u64(0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub size: Coord,
    /// Body segments, head first.
    pub body: Vec<Coord4>,
    pub food: Coord4,
    pub score: u32,
    pub paused: bool,
    pub lost: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn starts_centered_paused_and_fed() {
        let world = SnakeWorld::new(SNAKE_GRID_SIZE, 1);

        assert_eq!(world.head(), (3, 3, 3, 3));
        assert_eq!(world.len(), 1);
        assert_eq!(world.direction(), Dir::XPos);
        assert_eq!(world.score(), 0);
        assert!(world.is_paused());
        assert_ne!(world.food(), world.head());
        assert!(in_bounds(world.food(), SNAKE_GRID_SIZE));
    }

    #[test]
    fn paused_worlds_do_not_move() {
        let mut world = SnakeWorld::new(SNAKE_GRID_SIZE, 1);

        assert_eq!(world.tick(), TickOutcome::NoChange);
        assert_eq!(world.head(), (3, 3, 3, 3));

        world.resume();
        assert_eq!(world.tick(), TickOutcome::Moved);
        assert_eq!(world.head(), (4, 3, 3, 3));

        world.pause();
        assert_eq!(world.tick(), TickOutcome::NoChange);
        assert_eq!(world.head(), (4, 3, 3, 3));
    }

    #[test]
    fn movement_wraps_around_every_edge() {
        let mut world = SnakeWorld::from_parts(6, &[(5, 0, 2, 3)], (0, 1, 0, 0), Dir::XPos);

        assert_eq!(world.tick(), TickOutcome::Moved);
        assert_eq!(world.head(), (0, 0, 2, 3));

        world.set_direction(Dir::YNeg);
        assert_eq!(world.tick(), TickOutcome::Moved);
        assert_eq!(world.head(), (0, 5, 2, 3));
    }

    #[test]
    fn coordinates_stay_in_bounds_over_many_ticks() {
        let mut world = SnakeWorld::new(SNAKE_GRID_SIZE, 42);
        world.resume();

        let dirs = Dir::all();
        for step in 0..500 {
            world.set_direction(dirs[step % dirs.len()]);
            if world.tick() == TickOutcome::Died {
                world.reset();
                world.resume();
            }
            for segment in world.body() {
                assert!(in_bounds(segment, SNAKE_GRID_SIZE), "escaped at {segment:?}");
            }
            assert!(in_bounds(world.food(), SNAKE_GRID_SIZE));
        }
    }

    #[test]
    fn reversal_input_is_rejected() {
        let mut world = SnakeWorld::new(SNAKE_GRID_SIZE, 1);

        assert!(!world.set_direction(Dir::XNeg));
        assert_eq!(world.direction(), Dir::XPos);

        assert!(world.set_direction(Dir::WPos));
        assert_eq!(world.direction(), Dir::WPos);
        assert!(!world.set_direction(Dir::WNeg));
        assert_eq!(world.direction(), Dir::WPos);
    }

    #[test]
    fn eating_grows_scores_and_respawns_food() {
        let mut world = SnakeWorld::from_parts(6, &[(2, 2, 2, 2)], (3, 2, 2, 2), Dir::XPos);

        assert_eq!(world.tick(), TickOutcome::Ate);
        assert_eq!(world.len(), 2);
        assert_eq!(world.score(), 1);
        assert_eq!(world.head(), (3, 2, 2, 2));

        let body: Vec<_> = world.body().collect();
        assert_eq!(body, [(3, 2, 2, 2), (2, 2, 2, 2)]);
        assert!(!body.contains(&world.food()));
    }

    #[test]
    fn ticking_into_the_body_loses_without_mutation() {
        // the stored direction points straight at the second segment
        let segments = [(3, 2, 2, 2), (2, 2, 2, 2), (2, 3, 2, 2), (3, 3, 2, 2)];
        let mut world = SnakeWorld::from_parts(6, &segments, (0, 0, 0, 0), Dir::XNeg);

        assert_eq!(world.tick(), TickOutcome::Died);
        assert!(world.is_lost());
        let body: Vec<_> = world.body().collect();
        assert_eq!(body, segments);

        // terminal: further ticks and inputs are rejected
        assert_eq!(world.tick(), TickOutcome::NoChange);
        assert!(!world.set_direction(Dir::ZPos));
    }

    #[test]
    fn the_departing_tail_still_counts_for_collision() {
        // a closed 2x2 loop: the head steps onto the tail cell exactly as it
        // would have vacated it, which the rules score as a collision
        let segments = [(0, 0, 0, 0), (1, 0, 0, 0), (1, 1, 0, 0), (0, 1, 0, 0)];
        let mut world = SnakeWorld::from_parts(6, &segments, (5, 5, 5, 5), Dir::XNeg);

        world.set_direction(Dir::YPos);
        assert_eq!(world.tick(), TickOutcome::Died);
        assert!(world.is_lost());
    }

    #[test]
    fn reset_restores_the_initial_shape() {
        let mut world = SnakeWorld::from_parts(6, &[(0, 0, 0, 0), (1, 0, 0, 0)], (5, 5, 5, 5), Dir::XNeg);
        world.set_direction(Dir::YPos);
        world.tick();

        world.reset();
        assert_eq!(world.head(), (3, 3, 3, 3));
        assert_eq!(world.len(), 1);
        assert_eq!(world.direction(), Dir::XPos);
        assert_eq!(world.score(), 0);
        assert!(world.is_paused());
        assert_ne!(world.food(), world.head());
    }

    #[test]
    fn direction_vectors_round_trip_and_negate() {
        for dir in Dir::all() {
            assert_eq!(Dir::from_vector(dir.to_vector()), Some(dir));
            let (dx, dy, dz, dw) = dir.to_vector();
            assert_eq!(dir.opposite().to_vector(), (-dx, -dy, -dz, -dw));
            assert_eq!(
                i8::abs(dx) + i8::abs(dy) + i8::abs(dz) + i8::abs(dw),
                1,
                "{dir:?} is not a unit step"
            );
        }

        assert_eq!(Dir::from_vector((0, 0, 0, 0)), None);
        assert_eq!(Dir::from_vector((1, 1, 0, 0)), None);
    }

    #[test]
    fn snapshot_lists_the_body_head_first() {
        let mut world = SnakeWorld::from_parts(6, &[(2, 2, 2, 2)], (3, 2, 2, 2), Dir::XPos);
        world.tick();

        let snapshot = world.snapshot();
        assert_eq!(snapshot.body, [(3, 2, 2, 2), (2, 2, 2, 2)]);
        assert_eq!(snapshot.food, world.food());
        assert_eq!(snapshot.score, 1);
        assert!(!snapshot.paused && !snapshot.lost);

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
