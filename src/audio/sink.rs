use std::io::{Stderr, Write, stderr};

use crate::game::TickOutcome;

/// A sound to play in response to a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
}

impl SoundCue {
    /// The cue a tick outcome should trigger, if any
    pub fn for_outcome(outcome: TickOutcome) -> Option<Self> {
        match outcome {
            TickOutcome::Ate | TickOutcome::BoardFilled => Some(SoundCue::Eat),
            TickOutcome::Collided(_) => Some(SoundCue::GameOver),
            TickOutcome::Idle | TickOutcome::Moved => None,
        }
    }

    fn rings(&self) -> usize {
        match self {
            SoundCue::Eat => 1,
            SoundCue::GameOver => 2,
        }
    }
}

/// Fire-and-forget sound output. Failures never reach the game.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Rings the terminal bell: once on eat, twice on game over
pub struct TerminalBell<W: Write = Stderr> {
    out: W,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::with_writer(stderr())
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        let bells = "\x07".repeat(cue.rings());
        let result = self
            .out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush());

        if let Err(err) = result {
            log::warn!("failed to play {:?} cue: {}", cue, err);
        }
    }
}

/// Discards every cue (`--mute`)
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("muted {:?} cue", cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CollisionType;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_cue_for_outcome() {
        assert_eq!(SoundCue::for_outcome(TickOutcome::Ate), Some(SoundCue::Eat));
        assert_eq!(
            SoundCue::for_outcome(TickOutcome::Collided(CollisionType::Obstacle)),
            Some(SoundCue::GameOver)
        );
        assert_eq!(SoundCue::for_outcome(TickOutcome::Moved), None);
        assert_eq!(SoundCue::for_outcome(TickOutcome::Idle), None);
    }

    #[test]
    fn test_bell_rings() {
        let mut bell = TerminalBell::with_writer(Vec::new());
        bell.play(SoundCue::Eat);
        bell.play(SoundCue::GameOver);

        assert_eq!(bell.into_inner(), b"\x07\x07\x07".to_vec());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut bell = TerminalBell::with_writer(BrokenPipe);
        bell.play(SoundCue::GameOver);
    }
}
