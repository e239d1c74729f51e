/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tile {
    Floor,
    Wall,
    Bean,   // Score pickup
    Heart,  // Extra life pickup
    Player, // Occupancy marker
    Ghost,  // Occupancy marker
}

impl Tile {
    /// Can an actor ever step into this cell?
    pub fn is_passable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Is this an actor marker rather than terrain?
    pub fn is_actor(self) -> bool {
        matches!(self, Tile::Player | Tile::Ghost)
    }

    /// Parse a maze file glyph.
    pub fn from_glyph(ch: char) -> Option<Tile> {
        match ch {
            ' ' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Bean),
            '*' => Some(Tile::Heart),
            'P' => Some(Tile::Player),
            'G' => Some(Tile::Ghost),
            _ => None,
        }
    }

    /// Glyph used by maze files and debug dumps.
    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => ' ',
            Tile::Wall => '#',
            Tile::Bean => '.',
            Tile::Heart => '*',
            Tile::Player => 'P',
            Tile::Ghost => 'G',
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wall_blocks() {
        assert!(!Tile::Wall.is_passable());
        for t in [Tile::Floor, Tile::Bean, Tile::Heart, Tile::Player, Tile::Ghost] {
            assert!(t.is_passable(), "{t:?} should be passable");
        }
    }

    #[test]
    fn glyphs_are_consistent() {
        for t in [Tile::Floor, Tile::Wall, Tile::Bean, Tile::Heart, Tile::Player, Tile::Ghost] {
            assert_eq!(Tile::from_glyph(t.glyph()), Some(t));
        }
        assert_eq!(Tile::from_glyph('x'), None);
    }
}
