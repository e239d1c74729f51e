/// Movement direction requested by an actor.
/// `Stay` means "no movement requested".

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

/// Order in which passable directions are reported to decision logic.
pub const SCAN_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    /// Grid offset (dx, dy). Y grows downward.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Stay => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Stay => Direction::Stay,
        }
    }

    /// Compact encoding for lock-free handoff between threads.
    pub fn to_u8(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
            Direction::Stay => 4,
        }
    }

    pub fn from_u8(v: u8) -> Direction {
        match v {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            3 => Direction::Right,
            _ => Direction::Stay,
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_match_screen_axes() {
        assert_eq!(Direction::Up.offset(), (0, -1));
        assert_eq!(Direction::Down.offset(), (0, 1));
        assert_eq!(Direction::Left.offset(), (-1, 0));
        assert_eq!(Direction::Right.offset(), (1, 0));
        assert_eq!(Direction::Stay.offset(), (0, 0));
    }

    #[test]
    fn opposite_cancels_offset() {
        for d in SCAN_ORDER {
            let (ax, ay) = d.offset();
            let (bx, by) = d.opposite().offset();
            assert_eq!((ax + bx, ay + by), (0, 0));
        }
    }

    #[test]
    fn u8_encoding_covers_every_direction() {
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right, Direction::Stay] {
            assert_eq!(Direction::from_u8(d.to_u8()), d);
        }
        assert_eq!(Direction::from_u8(200), Direction::Stay);
    }
}
