//! Queue state
//!
//! Owns the play order and the now-playing index. Everything here is pure
//! index arithmetic; the controller turns the outcomes into media commands.
//!
//! ```text
//! original_order: A B C D E      (canonical, never reordered)
//! order:          C A E B D      (original or a shuffled permutation)
//! current_index:      ^          (always < order.len())
//! ```

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffled;
use crate::types::{RepeatMode, Track, TrackId};
use rand::Rng;

/// Outcome of advancing to the next track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Repeat-one: stay on the current track and restart it
    RestartCurrent,

    /// Moved forward to this index
    Moved(usize),

    /// Ran past the end with repeat-all and wrapped to this index (always 0)
    Wrapped(usize),

    /// Ran past the end without repeat-all; index stays on the last track
    EndOfQueue,
}

/// Outcome of retreating to the previous track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Moved back to this index
    Moved(usize),

    /// Ran before the start with repeat-all and wrapped to the last index
    Wrapped(usize),

    /// Ran before the start without repeat-all; index stays at 0
    StartOfQueue,
}

/// The mutable queue entity
#[derive(Debug, Clone)]
pub struct QueueState {
    /// Order currently in effect (original or shuffled)
    order: Vec<Track>,

    /// Canonical unshuffled order, source of truth for de-shuffling
    original_order: Vec<Track>,

    /// Index into `order`
    current_index: usize,

    /// Whether `order` is a shuffled permutation
    shuffled: bool,

    /// Loop policy
    repeat: RepeatMode,
}

impl QueueState {
    /// Create queue from the page-supplied tracks and starting index
    ///
    /// An empty queue is rejected. A starting index past the end is clamped
    /// to the last track.
    pub fn new(tracks: Vec<Track>, start_index: usize) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }

        let last = tracks.len() - 1;
        let current_index = if start_index > last {
            tracing::warn!(
                "Start index {} outside queue of {} tracks, using {}",
                start_index,
                tracks.len(),
                last
            );
            last
        } else {
            start_index
        };

        Ok(Self {
            original_order: tracks.clone(),
            order: tracks,
            current_index,
            shuffled: false,
            repeat: RepeatMode::Off,
        })
    }

    /// Number of tracks in the queue
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Track at `current_index`
    pub fn current(&self) -> &Track {
        &self.order[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Order currently in effect
    pub fn order(&self) -> &[Track] {
        &self.order
    }

    /// Canonical unshuffled order
    pub fn original_order(&self) -> &[Track] {
        &self.original_order
    }

    /// Ids of the order currently in effect
    pub fn order_ids(&self) -> Vec<TrackId> {
        self.order.iter().map(|t| t.id.clone()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.order.get(index)
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Advance repeat mode `Off -> All -> One -> Off`, returning the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.next();
        self.repeat
    }

    /// Position of the first track with this id in the current order
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.order.iter().position(|t| &t.id == id)
    }

    /// Step forward according to repeat mode
    pub fn advance(&mut self) -> Advance {
        if self.repeat == RepeatMode::One {
            return Advance::RestartCurrent;
        }

        let next = self.current_index + 1;
        if next < self.order.len() {
            self.current_index = next;
            Advance::Moved(next)
        } else if self.repeat == RepeatMode::All {
            self.current_index = 0;
            Advance::Wrapped(0)
        } else {
            self.current_index = self.order.len() - 1;
            Advance::EndOfQueue
        }
    }

    /// Step back according to repeat mode
    ///
    /// Repeat-one has no special meaning here.
    pub fn retreat(&mut self) -> Retreat {
        if self.current_index > 0 {
            self.current_index -= 1;
            Retreat::Moved(self.current_index)
        } else if self.repeat == RepeatMode::All {
            self.current_index = self.order.len() - 1;
            Retreat::Wrapped(self.current_index)
        } else {
            self.current_index = 0;
            Retreat::StartOfQueue
        }
    }

    /// Move to `index`; changes nothing when out of range
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        if index >= self.order.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.current_index = index;
        Ok(())
    }

    /// Flip the shuffle flag, returning the new value
    pub fn toggle_shuffle<R>(&mut self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let target = !self.shuffled;
        self.set_shuffled(target, rng);
        self.shuffled
    }

    /// Turn shuffle on or off, keeping the now-playing track current
    ///
    /// Turning on draws a fresh permutation of the original order; turning off
    /// restores the original order. Returns false when the flag already matched.
    pub fn set_shuffled<R>(&mut self, on: bool, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        if on == self.shuffled {
            return false;
        }

        let playing = self.current().id.clone();

        self.order = if on {
            shuffled(&self.original_order, rng)
        } else {
            self.original_order.clone()
        };
        self.shuffled = on;

        self.current_index = self
            .position_of(&playing)
            .unwrap_or_else(|| self.current_index.min(self.order.len() - 1));

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id), format!("/media/songs/{}.mp3", id))
    }

    fn abc_queue(start: usize) -> QueueState {
        QueueState::new(
            vec![create_test_track("A"), create_test_track("B"), create_test_track("C")],
            start,
        )
        .unwrap()
    }

    #[test]
    fn empty_queue_rejected() {
        let result = QueueState::new(vec![], 0);
        assert!(matches!(result, Err(PlaybackError::EmptyQueue)));
    }

    #[test]
    fn start_index_clamped() {
        let queue = abc_queue(10);
        assert_eq!(queue.current_index(), 2);
        assert_eq!(queue.current().id.as_str(), "C");
    }

    #[test]
    fn advance_off_moves_then_stops_at_end() {
        let mut queue = abc_queue(0);
        assert_eq!(queue.advance(), Advance::Moved(1));
        assert_eq!(queue.advance(), Advance::Moved(2));
        assert_eq!(queue.advance(), Advance::EndOfQueue);
        assert_eq!(queue.current_index(), 2);
        assert_eq!(queue.advance(), Advance::EndOfQueue);
        assert_eq!(queue.current_index(), 2);
    }

    #[test]
    fn advance_all_wraps() {
        let mut queue = abc_queue(2);
        queue.set_repeat_mode(RepeatMode::All);
        assert_eq!(queue.advance(), Advance::Wrapped(0));
        assert_eq!(queue.current().id.as_str(), "A");
    }

    #[test]
    fn advance_one_never_moves() {
        let mut queue = abc_queue(1);
        queue.set_repeat_mode(RepeatMode::One);
        assert_eq!(queue.advance(), Advance::RestartCurrent);
        assert_eq!(queue.current_index(), 1);
    }

    #[test]
    fn retreat_clamps_or_wraps_at_start() {
        let mut queue = abc_queue(1);
        assert_eq!(queue.retreat(), Retreat::Moved(0));
        assert_eq!(queue.retreat(), Retreat::StartOfQueue);
        assert_eq!(queue.current_index(), 0);

        queue.set_repeat_mode(RepeatMode::All);
        assert_eq!(queue.retreat(), Retreat::Wrapped(2));
        assert_eq!(queue.current().id.as_str(), "C");
    }

    #[test]
    fn retreat_ignores_repeat_one() {
        let mut queue = abc_queue(2);
        queue.set_repeat_mode(RepeatMode::One);
        assert_eq!(queue.retreat(), Retreat::Moved(1));
        assert_eq!(queue.retreat(), Retreat::Moved(0));
        assert_eq!(queue.retreat(), Retreat::StartOfQueue);
    }

    #[test]
    fn jump_out_of_range_is_noop() {
        let mut queue = abc_queue(1);
        assert!(matches!(queue.jump_to(5), Err(PlaybackError::IndexOutOfBounds(5))));
        assert!(queue.jump_to(3).is_err());
        assert_eq!(queue.current_index(), 1);

        assert!(queue.jump_to(2).is_ok());
        assert_eq!(queue.current_index(), 2);
    }

    #[test]
    fn shuffle_keeps_now_playing() {
        let tracks: Vec<Track> = (0..20).map(|i| create_test_track(&i.to_string())).collect();
        let mut queue = QueueState::new(tracks, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        assert!(queue.toggle_shuffle(&mut rng));
        assert!(queue.is_shuffled());
        assert_eq!(queue.current().id.as_str(), "7");
        assert_eq!(queue.original_order()[7].id.as_str(), "7");

        assert!(!queue.toggle_shuffle(&mut rng));
        assert!(!queue.is_shuffled());
        assert_eq!(queue.current_index(), 7);
        assert_eq!(queue.order(), queue.original_order());
    }

    #[test]
    fn unshuffle_relocates_after_navigation() {
        let tracks: Vec<Track> = (0..10).map(|i| create_test_track(&i.to_string())).collect();
        let mut queue = QueueState::new(tracks, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        queue.toggle_shuffle(&mut rng);
        queue.advance();
        queue.advance();
        let playing = queue.current().id.clone();

        queue.toggle_shuffle(&mut rng);
        assert_eq!(queue.current().id, playing);
        assert_eq!(queue.current_index(), playing.as_str().parse::<usize>().unwrap());
    }

    #[test]
    fn set_shuffled_same_value_is_noop() {
        let mut queue = abc_queue(0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(!queue.set_shuffled(false, &mut rng));
        assert!(queue.set_shuffled(true, &mut rng));
        assert!(!queue.set_shuffled(true, &mut rng));
    }

    #[test]
    fn cycle_repeat_returns_to_off() {
        let mut queue = abc_queue(0);
        assert_eq!(queue.cycle_repeat(), RepeatMode::All);
        assert_eq!(queue.cycle_repeat(), RepeatMode::One);
        assert_eq!(queue.cycle_repeat(), RepeatMode::Off);
    }
}
