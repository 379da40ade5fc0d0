//! Hand-off of audio tracks to an external player.
//!
//! Verification is the only trigger: a fresh scan of a product with audio
//! tracks hands the track list to the player and marks playback state as
//! playing from the first track. The player itself lives outside the core.

use std::sync::{Arc, Mutex, PoisonError};

/// External audio player the track list is handed to.
pub trait AudioSink: Send + Sync {
    /// Receive an ordered list of playable-resource locators.
    fn play(&self, tracks: &[String]);
}

/// Sink that discards the hand-off (headless callers, tests).
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, _tracks: &[String]) {}
}

/// Playback state surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub tracks: Vec<String>,
    pub current_track: usize,
    pub playing: bool,
}

/// The side-effect contract: hands tracks to the sink and tracks state.
pub struct PlaybackTrigger {
    sink: Arc<dyn AudioSink>,
    state: Mutex<PlaybackState>,
}

impl PlaybackTrigger {
    /// Create a trigger wrapping the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            state: Mutex::new(PlaybackState::default()),
        }
    }

    /// Hand the tracks to the player and mark playback started at track 0.
    ///
    /// An empty track list is a no-op.
    pub fn start(&self, tracks: &[String]) {
        if tracks.is_empty() {
            return;
        }
        self.sink.play(tracks);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = PlaybackState {
            tracks: tracks.to_vec(),
            current_track: 0,
            playing: true,
        };
    }

    /// Snapshot of the current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for PlaybackTrigger {
    fn default() -> Self {
        Self::new(Arc::new(NullSink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        received: Mutex<Vec<Vec<String>>>,
    }

    impl AudioSink for RecordingSink {
        fn play(&self, tracks: &[String]) {
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(tracks.to_vec());
        }
    }

    #[test]
    fn test_start_hands_tracks_and_marks_playing() {
        let sink = Arc::new(RecordingSink::default());
        let trigger = PlaybackTrigger::new(Arc::clone(&sink) as Arc<dyn AudioSink>);

        let tracks = vec!["https://cdn.amberline.shop/a.mp3".to_owned()];
        trigger.start(&tracks);

        let state = trigger.state();
        assert!(state.playing);
        assert_eq!(state.current_track, 0);
        assert_eq!(state.tracks, tracks);
        assert_eq!(sink.received.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_track_list_is_noop() {
        let sink = Arc::new(RecordingSink::default());
        let trigger = PlaybackTrigger::new(Arc::clone(&sink) as Arc<dyn AudioSink>);

        trigger.start(&[]);
        assert!(!trigger.state().playing);
        assert!(sink.received.lock().unwrap().is_empty());
    }
}
