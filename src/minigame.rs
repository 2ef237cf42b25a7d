//! The timed tap mini-game.

use tracing::info;

use crate::config::EngineConfig;

/// Final score of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiniGameResult {
    /// Taps counted in the round.
    pub taps: u32,
    /// Whole taps per second of round time.
    pub per_second: u32,
}

impl MiniGameResult {
    /// Line shown once the round ends.
    pub fn summary(&self) -> String {
        format!("Dash: {} taps, {} per second!", self.taps, self.per_second)
    }
}

/// Timed rapid-tap counter.
#[derive(Debug, Clone)]
pub struct MiniGame {
    duration_ms: u64,
    pulse_every: u32,
    pulse_ms: u64,
    active: bool,
    start_ms: u64,
    taps: u32,
    pulse_start_ms: Option<u64>,
}

impl MiniGame {
    /// Idle mini-game with timings from the config.
    pub fn new(cfg: &EngineConfig) -> Self {
        MiniGame {
            duration_ms: cfg.minigame_duration_ms,
            pulse_every: cfg.minigame_pulse_every.max(1),
            pulse_ms: cfg.minigame_pulse_ms,
            active: false,
            start_ms: 0,
            taps: 0,
            pulse_start_ms: None,
        }
    }

    /// A round is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Taps so far.
    pub fn taps(&self) -> u32 {
        self.taps
    }

    /// Begin a round with the counter at zero.
    pub fn start(&mut self, now_ms: u64) {
        info!(duration_ms = self.duration_ms, "minigame_started");
        self.active = true;
        self.start_ms = now_ms;
        self.taps = 0;
        self.pulse_start_ms = None;
    }

    /// Time left in the round.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.duration_ms
            .saturating_sub(now_ms.saturating_sub(self.start_ms))
    }

    /// Count one tap edge. Every `pulse_every`-th tap starts an emphasis pulse.
    pub fn tap(&mut self, now_ms: u64) {
        if !self.active || self.remaining_ms(now_ms) == 0 {
            return;
        }
        self.taps += 1;
        if self.taps % self.pulse_every == 0 {
            self.pulse_start_ms = Some(now_ms);
        }
    }

    /// Expire the pulse and, once the round time is up, end the round.
    pub fn update(&mut self, now_ms: u64) -> Option<MiniGameResult> {
        if self
            .pulse_start_ms
            .is_some_and(|s| now_ms.saturating_sub(s) >= self.pulse_ms)
        {
            self.pulse_start_ms = None;
        }
        if !self.active || self.remaining_ms(now_ms) > 0 {
            return None;
        }
        self.active = false;
        self.pulse_start_ms = None;
        let seconds = (self.duration_ms / 1000).max(1) as u32;
        let result = MiniGameResult {
            taps: self.taps,
            per_second: self.taps / seconds,
        };
        info!(taps = result.taps, per_second = result.per_second, "minigame_finished");
        Some(result)
    }

    /// Whether the counter should be drawn emphasised right now.
    pub fn is_pulsing(&self, now_ms: u64) -> bool {
        self.pulse_start_ms
            .is_some_and(|s| now_ms.saturating_sub(s) < self.pulse_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> MiniGame {
        MiniGame::new(&EngineConfig::default())
    }

    #[test]
    fn ten_taps_trigger_exactly_one_pulse() {
        let mut g = game();
        g.start(0);
        for i in 0..9 {
            g.tap(100 + i * 10);
            assert!(!g.is_pulsing(100 + i * 10));
        }
        g.tap(500);
        assert!(g.is_pulsing(500));
        assert!(g.is_pulsing(664));
        assert_eq!(g.update(665), None);
        assert!(!g.is_pulsing(665));
        // no retrigger while the count stays at ten
        assert_eq!(g.update(900), None);
        assert!(!g.is_pulsing(900));
        assert_eq!(g.taps(), 10);
    }

    #[test]
    fn round_ends_at_five_seconds_regardless_of_taps() {
        let mut g = game();
        g.start(1_000);
        g.tap(1_500);
        assert_eq!(g.update(5_999), None);
        assert!(g.is_active());
        let result = g.update(6_000).unwrap();
        assert_eq!(result, MiniGameResult { taps: 1, per_second: 0 });
        assert!(!g.is_active());
        assert_eq!(g.update(7_000), None);
    }

    #[test]
    fn taps_after_the_window_do_not_count() {
        let mut g = game();
        g.start(0);
        g.tap(5_000);
        g.tap(4_999);
        assert_eq!(g.taps(), 1);
    }

    #[test]
    fn summary_reports_rate() {
        let mut g = game();
        g.start(0);
        for i in 0..26 {
            g.tap(i * 100);
        }
        let result = g.update(5_000).unwrap();
        assert_eq!(result.per_second, 5);
        assert_eq!(result.summary(), "Dash: 26 taps, 5 per second!");
    }

    #[test]
    fn restart_clears_previous_round() {
        let mut g = game();
        g.start(0);
        g.tap(1);
        g.update(5_000);
        g.start(10_000);
        assert_eq!(g.taps(), 0);
        assert!(g.is_active());
    }
}
