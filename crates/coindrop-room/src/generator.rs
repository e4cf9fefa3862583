//! Spatial coin generator.

use coindrop_protocol::{Coin, CoinId, Position};
use rand::Rng;

use crate::RoomConfig;

/// Produces one generation cycle's coin set for a room.
///
/// Exactly `coin_count` coins, each axis sampled independently and
/// uniformly from the room's bounds, both ends inclusive. Coin ids are
/// `coin_<room>_<index>`, unique within the set; positions carry no
/// uniqueness guarantee.
///
/// Pure apart from the thread-local RNG. The caller is responsible for
/// the `min ≤ max` invariant on the bounds ([`RoomDirectory`] enforces
/// it at construction).
///
/// [`RoomDirectory`]: crate::RoomDirectory
pub fn generate_coins(config: &RoomConfig) -> Vec<Coin> {
    let mut rng = rand::rng();
    let area = &config.area;

    (0..config.coin_count)
        .map(|i| Coin {
            id: CoinId::new(format!("coin_{}_{}", config.id, i)),
            position: Position {
                x: rng.random_range(area.x_min..=area.x_max),
                y: rng.random_range(area.y_min..=area.y_max),
                z: rng.random_range(area.z_min..=area.z_max),
            },
        })
        .collect()
}
