//! Playback over a recorded history
//!
//! [`Playback`] owns the active [`History`], the current position and a
//! [`RepeatingTimer`]. Transport operations only move the position; the
//! algorithm is never re-run. Every position change queues a
//! [`PlaybackEvent::Redraw`] with the step to draw and a
//! [`PlaybackEvent::Log`] with its message, which the UI drains with
//! [`Playback::drain_events`].

pub mod timer;

pub use timer::RepeatingTimer;

use crate::constants::{MAX_SPEED, MIN_SPEED, SPEED_BASE_MS};
use crate::error::{Result, VizError};
use crate::snapshot::{History, Step};
use std::time::{Duration, Instant};

/// Output produced by playback for the renderer and the log pane
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Redraw(Step),
    Log(String),
}

/// Timer interval for a speed setting: `1005 - 10 * speed` milliseconds
pub fn interval_for(speed: u32) -> Result<Duration> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(VizError::InvalidSpeed(speed));
    }
    Ok(Duration::from_millis(SPEED_BASE_MS - 10 * u64::from(speed)))
}

#[derive(Debug, Clone)]
pub struct Playback {
    history: History,
    position: usize,
    speed: u32,
    timer: RepeatingTimer,
    events: Vec<PlaybackEvent>,
}

impl Playback {
    pub fn new(speed: u32) -> Result<Self> {
        Ok(Playback {
            history: History::new(),
            position: 0,
            speed,
            timer: RepeatingTimer::new(interval_for(speed)?),
            events: Vec::new(),
        })
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn current(&self) -> Option<&Step> {
        self.history.get(self.position)
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.history.len()
    }

    /// Replace the history, rewind to the first step and draw it
    pub fn load(&mut self, history: History) {
        self.timer.disarm();
        self.history = history;
        self.position = 0;
        self.emit_current();
    }

    /// Begin auto-advancing. No-op on an empty history or while running.
    pub fn start(&mut self, now: Instant) {
        if self.history.is_empty() || self.timer.is_armed() {
            return;
        }
        self.timer.arm(now);
    }

    pub fn pause(&mut self) {
        self.timer.disarm();
    }

    /// Pause and rewind to the first step
    pub fn stop(&mut self) {
        self.timer.disarm();
        self.position = 0;
        self.emit_current();
    }

    pub fn next(&mut self) {
        self.timer.disarm();
        self.advance();
    }

    pub fn previous(&mut self) {
        self.timer.disarm();
        if self.position > 0 {
            self.position -= 1;
            self.emit_current();
        }
    }

    /// Change the auto-advance cadence, in place if running. The position
    /// is left alone.
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        let interval = interval_for(speed)?;
        self.speed = speed;
        self.timer.set_interval(interval);
        Ok(())
    }

    /// Advance one step as the timer would, disarming once the end is
    /// reached
    pub fn tick(&mut self) {
        if self.is_at_end() {
            self.timer.disarm();
            return;
        }
        self.advance();
        if self.is_at_end() {
            self.timer.disarm();
        }
    }

    /// Run a tick if the timer is due at `now`; returns whether one ran
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) {
            self.tick();
            true
        } else {
            false
        }
    }

    /// Queue a free-standing log line
    pub fn log(&mut self, line: impl Into<String>) {
        self.events.push(PlaybackEvent::Log(line.into()));
    }

    /// Take every queued event in emission order
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    fn advance(&mut self) {
        if self.position + 1 < self.history.len() {
            self.position += 1;
            self.emit_current();
        }
    }

    fn emit_current(&mut self) {
        if let Some(step) = self.history.get(self.position) {
            let message = step.message().to_string();
            self.events.push(PlaybackEvent::Redraw(step.clone()));
            self.events.push(PlaybackEvent::Log(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SortStep;

    fn history(len: usize) -> History {
        (0..len)
            .map(|i| Step::from(SortStep::new(&[i as i32], format!("step {}", i))))
            .collect()
    }

    fn loaded(len: usize) -> Playback {
        let mut playback = Playback::new(80).unwrap();
        playback.load(history(len));
        playback.drain_events();
        playback
    }

    #[test]
    fn test_load_emits_first_step_and_log() {
        let mut playback = Playback::new(80).unwrap();
        playback.load(history(3));

        let events = playback.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], PlaybackEvent::Redraw(step) if step.message() == "step 0"));
        assert_eq!(events[1], PlaybackEvent::Log("step 0".into()));
        assert!(playback.drain_events().is_empty());
    }

    #[test]
    fn test_load_empty_history_is_silent() {
        let mut playback = Playback::new(80).unwrap();
        playback.load(History::new());
        playback.start(Instant::now());

        assert!(playback.drain_events().is_empty());
        assert!(!playback.is_playing());
        assert!(playback.current().is_none());
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut playback = loaded(4);
        for _ in 0..9 {
            playback.next();
        }
        assert_eq!(playback.position(), 3);
        // Only the three real moves produced redraws
        let redraws = playback
            .drain_events()
            .iter()
            .filter(|e| matches!(e, PlaybackEvent::Redraw(_)))
            .count();
        assert_eq!(redraws, 3);
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut playback = loaded(4);
        playback.previous();
        assert_eq!(playback.position(), 0);
        assert!(playback.drain_events().is_empty());
    }

    #[test]
    fn test_next_disarms_timer() {
        let mut playback = loaded(4);
        playback.start(Instant::now());
        assert!(playback.is_playing());

        playback.next();
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_tick_self_disarms_at_end() {
        let start = Instant::now();
        let mut playback = loaded(3);
        playback.start(start);

        let step = playback.interval();
        assert!(playback.poll(start + step));
        assert!(playback.is_playing());
        assert!(playback.poll(start + step * 2));
        assert_eq!(playback.position(), 2);
        assert!(!playback.is_playing());
        assert!(!playback.poll(start + step * 3));
    }

    #[test]
    fn test_stop_rewinds_and_redraws() {
        let mut playback = loaded(5);
        playback.next();
        playback.next();
        playback.drain_events();

        playback.stop();
        assert_eq!(playback.position(), 0);
        assert_eq!(
            playback.drain_events().last(),
            Some(&PlaybackEvent::Log("step 0".into()))
        );
    }

    #[test]
    fn test_set_speed_keeps_position() {
        let mut playback = loaded(5);
        playback.next();
        playback.start(Instant::now());

        playback.set_speed(100).unwrap();
        assert_eq!(playback.position(), 1);
        assert!(playback.is_playing());
        assert_eq!(playback.interval(), Duration::from_millis(5));

        assert!(matches!(playback.set_speed(0), Err(VizError::InvalidSpeed(0))));
        assert!(playback.set_speed(101).is_err());
        assert_eq!(playback.speed(), 100);
    }

    #[test]
    fn test_interval_mapping() {
        assert_eq!(interval_for(1).unwrap(), Duration::from_millis(995));
        assert_eq!(interval_for(80).unwrap(), Duration::from_millis(205));
        assert!(Playback::new(0).is_err());
    }
}
