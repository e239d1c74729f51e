/// Maze layouts.
///
/// ## Sources (priority order):
///   1. `maze_file` from config.toml
///   2. Built-in layout
///
/// ## Format:
///   Exactly `WORLD_HEIGHT` lines of `WORLD_WIDTH` glyphs.
///   Lines starting with `;` are comments and skipped.
///
/// ## Tile legend:
///   '#' = Wall      '.' = Bean      '*' = Heart
///   'P' = Player    'G' = Ghost     ' ' = Floor
///
/// Ghost ids follow reading order. Ghost start cells are marked on the
/// grid at construction.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::entity::{Ghost, Player, BEAN_VALUE, WORLD_HEIGHT, WORLD_WIDTH};
use crate::domain::tile::Tile;
use crate::error::LevelError;
use super::grid::Grid;
use super::world::GameState;

const BUILTIN: [&str; WORLD_HEIGHT] = [
    "#######################",
    "#..........#..........#",
    "#.###.####.#.####.###.#",
    "#*###.####.#.####.###*#",
    "#.....................#",
    "#.###.#.#######.#.###.#",
    "#.....#....#....#.....#",
    "#####.####.#.####.#####",
    "#####.#.........#.#####",
    "#G....#.##.G.##.#....G#",
    "#####.#.#.....#.#.#####",
    "#####...#..G..#...#####",
    "#####.#.#######.#.#####",
    "#####.#.........#.#####",
    "#####.#.#######.#.#####",
    "#..........P..........#",
    "#.###.####.#.####.###.#",
    "#*..#.............#..*#",
    "###.#.#.#######.#.#.###",
    "#.....#....#....#.....#",
    "#######################",
];

/// Build the starting state for a level.
pub fn parse_level(text: &str) -> Result<GameState, LevelError> {
    let rows: Vec<&str> = text
        .lines()
        .filter(|l| !l.starts_with(';'))
        .collect();

    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    if height != WORLD_HEIGHT || rows.iter().any(|r| r.chars().count() != WORLD_WIDTH) {
        return Err(LevelError::WrongDimensions {
            expected_w: WORLD_WIDTH,
            expected_h: WORLD_HEIGHT,
            width,
            height,
        });
    }

    let mut cells = vec![vec![Tile::Floor; WORLD_WIDTH]; WORLD_HEIGHT];
    let mut player: Option<Player> = None;
    let mut ghosts = vec![];

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let tile = Tile::from_glyph(ch)
                .ok_or(LevelError::UnknownGlyph { glyph: ch, x, y })?;
            match tile {
                Tile::Player => {
                    if player.is_some() {
                        return Err(LevelError::ExtraPlayer { x, y });
                    }
                    player = Some(Player::new(x, y));
                }
                Tile::Ghost => ghosts.push(Ghost::new(ghosts.len(), x, y)),
                _ => {}
            }
            cells[y][x] = tile;
        }
    }

    let player = player.ok_or(LevelError::MissingPlayer)?;
    if ghosts.is_empty() {
        return Err(LevelError::NoGhosts);
    }

    let grid = Grid::from_rows(cells);
    let beans = grid.count(Tile::Bean) as u32;
    Ok(GameState::new(grid, player, ghosts, BEAN_VALUE * beans))
}

pub fn builtin_level() -> Result<GameState, LevelError> {
    parse_level(&BUILTIN.join("\n"))
}

/// Load `path` if given, falling back to the built-in maze on any error.
pub fn load_level(path: Option<&Path>) -> Result<GameState, LevelError> {
    if let Some(path) = path {
        match std::fs::read_to_string(path)
            .map_err(LevelError::from)
            .and_then(|text| parse_level(&text))
        {
            Ok(state) => {
                info!(path = %path.display(), "loaded maze file");
                return Ok(state);
            }
            Err(e) => warn!(path = %path.display(), "maze file rejected: {e}; using built-in maze"),
        }
    }
    builtin_level()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{GHOST_STARTS, PLAYER_START};

    #[test]
    fn builtin_matches_fixed_layout() {
        let s = builtin_level().unwrap();
        assert_eq!((s.grid.width, s.grid.height), (WORLD_WIDTH, WORLD_HEIGHT));
        assert_eq!((s.player.x, s.player.y), PLAYER_START);
        let mut starts: Vec<_> = s.ghosts.iter().map(|g| (g.start_x, g.start_y)).collect();
        let mut expected = GHOST_STARTS.to_vec();
        starts.sort();
        expected.sort();
        assert_eq!(starts, expected);
        assert_eq!(s.grid.count(Tile::Player), 1);
        assert_eq!(s.grid.count(Tile::Ghost), GHOST_STARTS.len());
        assert_eq!(s.win_score, BEAN_VALUE * s.grid.count(Tile::Bean) as u32);
        assert!(s.win_score > 0);
    }

    #[test]
    fn builtin_border_is_walled() {
        let s = builtin_level().unwrap();
        for x in 0..WORLD_WIDTH {
            assert_eq!(s.tile(x, 0), Some(Tile::Wall));
            assert_eq!(s.tile(x, WORLD_HEIGHT - 1), Some(Tile::Wall));
        }
        for y in 0..WORLD_HEIGHT {
            assert_eq!(s.tile(0, y), Some(Tile::Wall));
            assert_eq!(s.tile(WORLD_WIDTH - 1, y), Some(Tile::Wall));
        }
    }

    #[test]
    fn every_actor_can_move_at_start() {
        let s = builtin_level().unwrap();
        assert!(!s.grid.passable_directions(s.player.x, s.player.y).is_empty());
        for g in &s.ghosts {
            assert!(!s.grid.passable_directions(g.x, g.y).is_empty(), "ghost {} boxed in", g.id);
        }
    }

    fn with_row(y: usize, row: &str) -> String {
        let mut rows: Vec<String> = BUILTIN.iter().map(|r| r.to_string()).collect();
        rows[y] = row.to_string();
        rows.join("\n")
    }

    #[test]
    fn comments_are_skipped() {
        let text = format!("; my maze\n{}", BUILTIN.join("\n"));
        assert!(parse_level(&text).is_ok());
    }

    #[test]
    fn rejects_wrong_size() {
        let err = parse_level("#P G#").unwrap_err();
        assert!(matches!(err, LevelError::WrongDimensions { height: 1, .. }));
    }

    #[test]
    fn rejects_unknown_glyph() {
        let err = parse_level(&with_row(4, "#....x................#")).unwrap_err();
        assert!(matches!(err, LevelError::UnknownGlyph { glyph: 'x', x: 5, y: 4 }));
    }

    #[test]
    fn rejects_second_player() {
        let err = parse_level(&with_row(4, "#P....................#")).unwrap_err();
        assert!(matches!(err, LevelError::ExtraPlayer { x: 11, y: 15 }));
    }

    #[test]
    fn rejects_missing_player_and_ghosts() {
        let err = parse_level(&with_row(15, "#.....................#")).unwrap_err();
        assert!(matches!(err, LevelError::MissingPlayer));

        let no_ghosts = BUILTIN.join("\n").replace('G', " ");
        assert!(matches!(parse_level(&no_ghosts).unwrap_err(), LevelError::NoGhosts));
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let s = load_level(Some(Path::new("/definitely/not/here.txt"))).unwrap();
        assert_eq!((s.player.x, s.player.y), PLAYER_START);
    }
}
