use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::Rng;
use rand::seq::SliceRandom;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Picks one of the four directions uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::Right)
    }

    /// Unit step in cell coordinates. `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Events an input source hands to the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
}

impl GameInput {
    /// Maps a terminal event to a game input. Key releases and repeats of
    /// unrelated keys yield `None`.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::from_key_event(*key),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Self::Quit),
            (_, KeyCode::Esc) => Some(Self::Quit),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Self::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k') | KeyCode::Up) => {
                Some(Self::Direction(Direction::Up))
            }
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j') | KeyCode::Down) => {
                Some(Self::Direction(Direction::Down))
            }
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h') | KeyCode::Left) => {
                Some(Self::Direction(Direction::Left))
            }
            (KeyModifiers::NONE, KeyCode::Char('d' | 'l') | KeyCode::Right) => {
                Some(Self::Direction(Direction::Right))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    use super::{Direction, GameInput};

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn random_direction_eventually_covers_all_four() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = Vec::new();

        for _ in 0..200 {
            let direction = Direction::random(&mut rng);
            if !seen.contains(&direction) {
                seen.push(direction);
            }
        }

        assert_eq!(seen.len(), 4);
    }

    #[rstest]
    #[case(KeyCode::Up, KeyModifiers::NONE, Some(GameInput::Direction(Direction::Up)))]
    #[case(KeyCode::Char('a'), KeyModifiers::NONE, Some(GameInput::Direction(Direction::Left)))]
    #[case(KeyCode::Char('j'), KeyModifiers::NONE, Some(GameInput::Direction(Direction::Down)))]
    #[case(KeyCode::Right, KeyModifiers::NONE, Some(GameInput::Direction(Direction::Right)))]
    #[case(KeyCode::Char('q'), KeyModifiers::NONE, Some(GameInput::Quit))]
    #[case(KeyCode::Esc, KeyModifiers::NONE, Some(GameInput::Quit))]
    #[case(KeyCode::Char('c'), KeyModifiers::CONTROL, Some(GameInput::Quit))]
    #[case(KeyCode::Char('x'), KeyModifiers::NONE, None)]
    #[case(KeyCode::Up, KeyModifiers::ALT, None)]
    fn key_events_map_to_inputs(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: Option<GameInput>,
    ) {
        assert_eq!(
            GameInput::from_key_event(KeyEvent::new(code, modifiers)),
            expected
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        let press = Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));

        assert_eq!(GameInput::from_event(&release), None);
        assert_eq!(
            GameInput::from_event(&press),
            Some(GameInput::Direction(Direction::Up))
        );
    }
}
