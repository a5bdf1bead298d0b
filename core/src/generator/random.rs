use ndarray::Array4;

use super::*;

/// Uniform rejection-sampling placement: draw coordinates until the requested
/// number of distinct cells carries a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        // the sampling loop below only terminates with at least one free cell
        if config.mines >= config.total_cells() {
            return Err(GameError::TooManyMines);
        }

        let mut mine_mask: Array4<bool> = Array4::default(hyper_dim(config.size));
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;

        while mines_placed < config.mines {
            let coords = (
                rng.random_range(0..config.size),
                rng.random_range(0..config.size),
                rng.random_range(0..config.size),
                rng.random_range(0..config.size),
            );
            let cell = &mut mine_mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != config.mines {
            log::warn!(
                "generated mine count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mines() {
        let config = GameConfig::new(4, 20);
        let layout = RandomMineGenerator::new(99).generate(config).unwrap();

        assert_eq!(layout.mine_count(), 20);
        assert_eq!(layout.size(), 4);
        let mined = iter_cells(4).filter(|&pos| layout.contains_mine(pos)).count();
        assert_eq!(mined, 20);
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let config = GameConfig::new(4, 20);
        let a = RandomMineGenerator::new(7).generate(config).unwrap();
        let b = RandomMineGenerator::new(7).generate(config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_oversized_mine_counts() {
        let full = GameConfig::new(2, 16);
        assert_eq!(
            RandomMineGenerator::new(0).generate(full),
            Err(GameError::TooManyMines)
        );

        let nearly_full = GameConfig::new(2, 15);
        assert!(RandomMineGenerator::new(0).generate(nearly_full).is_ok());
    }

    #[test]
    fn zero_mines_is_a_valid_configuration() {
        let layout = RandomMineGenerator::new(0)
            .generate(GameConfig::new(4, 0))
            .unwrap();
        assert_eq!(layout.mine_count(), 0);
        assert!(iter_cells(4).all(|pos| layout.adjacent_mine_count(pos) == 0));
    }
}
