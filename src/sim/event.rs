/// Events emitted while resolving moves.
/// The presentation layer consumes these for sound.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    BeanCollected { x: usize, y: usize },
    HeartCollected { x: usize, y: usize },
    GhostMoved { id: usize, x: usize, y: usize },
    LifeLost { remaining: u32 },
    Won,
    Lost,
}
