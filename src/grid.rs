use crate::config::ConfigError;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Toroidal play field. Every edge is joined to the opposite one.
///
/// Dimensions are fixed for the whole session and always non-zero, so
/// [`Grid::wrap`] is total.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    /// Creates a grid, rejecting zero-sized dimensions up front.
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }

        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u16 {
        self.height
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Cell the snake starts from.
    #[must_use]
    pub fn center(self) -> Position {
        Position {
            x: i32::from(self.width / 2),
            y: i32::from(self.height / 2),
        }
    }

    /// Returns true when the position lies inside the grid.
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < i32::from(self.width)
            && position.y < i32::from(self.height)
    }

    /// Steps one cell from `position` towards `direction`, wrapping around
    /// the edges.
    #[must_use]
    pub fn wrap(self, position: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: wrap_axis(position.x + dx, i32::from(self.width)),
            y: wrap_axis(position.y + dy, i32::from(self.height)),
        }
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Position { x, y }))
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    value.rem_euclid(upper_bound)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Grid, Position};
    use crate::config::ConfigError;
    use crate::input::Direction;

    #[rstest]
    #[case(Position::new(0, 3), Direction::Left, Position::new(9, 3))]
    #[case(Position::new(9, 3), Direction::Right, Position::new(0, 3))]
    #[case(Position::new(4, 0), Direction::Up, Position::new(4, 7))]
    #[case(Position::new(4, 7), Direction::Down, Position::new(4, 0))]
    #[case(Position::new(4, 4), Direction::Right, Position::new(5, 4))]
    #[case(Position::new(4, 4), Direction::Up, Position::new(4, 3))]
    fn wrap_steps_across_edges(
        #[case] start: Position,
        #[case] direction: Direction,
        #[case] expected: Position,
    ) {
        let grid = Grid::new(10, 8).expect("grid should be valid");
        assert_eq!(grid.wrap(start, direction), expected);
    }

    #[test]
    fn wrap_always_stays_in_bounds() {
        let grid = Grid::new(5, 3).expect("grid should be valid");

        for cell in grid.cells() {
            for direction in Direction::ALL {
                let next = grid.wrap(cell, direction);
                assert!(grid.contains(next), "{cell:?} + {direction:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn single_cell_grid_wraps_onto_itself() {
        let grid = Grid::new(1, 1).expect("grid should be valid");

        for direction in Direction::ALL {
            assert_eq!(grid.wrap(Position::new(0, 0), direction), Position::new(0, 0));
        }
    }

    #[test]
    fn zero_dimensions_fail_fast() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 5
            })
        ));
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn center_and_cells_cover_the_grid() {
        let grid = Grid::new(24, 24).expect("grid should be valid");

        assert_eq!(grid.center(), Position::new(12, 12));
        assert_eq!(grid.cells().count(), grid.total_cells());
        assert!(grid.cells().all(|cell| grid.contains(cell)));
    }
}
