use std::sync::Mutex;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::entities::Player;
use crate::domain::services::randomize_start_order;
use crate::domain::value_objects::Dice;

/// Shared random source for server-side dice and start-order rotation
pub struct Randomizer {
    rng: Mutex<ChaCha8Rng>,
}

impl Randomizer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }

    pub fn roll_dice(&self) -> Dice {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Dice::roll(&mut *rng)
    }

    pub fn rotate_start(&self, roster: Vec<Player>) -> Vec<Player> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        randomize_start_order(roster, &mut *rng)
    }
}
