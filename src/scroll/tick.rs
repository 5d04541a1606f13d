/// Something that can make a tick audible.
///
/// The controller decides *when* a tick happens; a cue only renders it.
/// An unavailable cue is skipped and the visual pulse still fires.
pub trait TickCue {
    fn play_tick(&mut self);
    fn is_available(&self) -> bool;
}

/// A cue with no audio device behind it.
#[derive(Debug, Default)]
pub struct SilentCue;

impl TickCue for SilentCue {
    fn play_tick(&mut self) {}

    fn is_available(&self) -> bool {
        false
    }
}

/// Short sine click on the default output device.
#[cfg(feature = "tick-sound")]
pub struct SoundCue {
    // Dropping the stream silences the handle.
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

#[cfg(feature = "tick-sound")]
impl SoundCue {
    const FREQUENCY_HZ: f32 = 1800.0;
    const LENGTH: std::time::Duration = std::time::Duration::from_millis(30);
    const VOLUME: f32 = 0.12;

    /// Open the default output device, or `None` if there is none.
    pub fn open() -> Option<Self> {
        match rodio::OutputStream::try_default() {
            Ok((stream, handle)) => Some(Self {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                log::warn!("no audio output for tick sound: {}", e);
                None
            }
        }
    }
}

#[cfg(feature = "tick-sound")]
impl TickCue for SoundCue {
    fn play_tick(&mut self) {
        use rodio::Source;

        let click = rodio::source::SineWave::new(Self::FREQUENCY_HZ)
            .take_duration(Self::LENGTH)
            .amplify(Self::VOLUME);
        if let Err(e) = self.handle.play_raw(click) {
            log::debug!("tick sound dropped: {}", e);
        }
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Keep `candidate` if it can play, otherwise fall back to [`SilentCue`].
pub fn pick_cue(candidate: Option<Box<dyn TickCue>>) -> Box<dyn TickCue> {
    match candidate {
        Some(cue) if cue.is_available() => cue,
        _ => {
            log::info!("tick sound unavailable, ticks are visual only");
            Box::new(SilentCue)
        }
    }
}

/// The cue the app starts with.
pub fn default_cue() -> Box<dyn TickCue> {
    #[cfg(feature = "tick-sound")]
    let candidate = SoundCue::open().map(|cue| Box::new(cue) as Box<dyn TickCue>);
    #[cfg(not(feature = "tick-sound"))]
    let candidate: Option<Box<dyn TickCue>> = None;

    pick_cue(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeCue {
        available: bool,
        plays: Rc<Cell<u32>>,
    }

    impl TickCue for FakeCue {
        fn play_tick(&mut self) {
            self.plays.set(self.plays.get() + 1);
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[test]
    fn working_cue_is_kept() {
        let plays = Rc::new(Cell::new(0));
        let mut cue = pick_cue(Some(Box::new(FakeCue {
            available: true,
            plays: plays.clone(),
        })));
        assert!(cue.is_available());
        cue.play_tick();
        assert_eq!(plays.get(), 1);
    }

    #[test]
    fn broken_or_missing_cue_falls_back_to_silence() {
        let plays = Rc::new(Cell::new(0));
        let mut cue = pick_cue(Some(Box::new(FakeCue {
            available: false,
            plays: plays.clone(),
        })));
        assert!(!cue.is_available());
        cue.play_tick();
        assert_eq!(plays.get(), 0);

        assert!(!pick_cue(None).is_available());
    }

    #[cfg(not(feature = "tick-sound"))]
    #[test]
    fn default_build_is_silent() {
        assert!(!default_cue().is_available());
    }
}
