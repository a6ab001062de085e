use crate::auth::MockAuth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{FinalReport, SessionObserver};
use crate::leaderboard::{LeaderboardEntry, LeaderboardStore};
use crate::passages::{Category, TextSource};
use crate::report::completion_message;
use crate::runtime::{Clock, HostEvent, Scheduler, TimerHandle};
use crate::session::SessionStatus;
use crate::typing::TypingSession;
use crate::util::format_clock;

/// Everything a UI shell drives: the typing session plus the text source,
/// signed-in user and leaderboard around it.
///
/// Finished sessions are recorded on the leaderboard when a user is signed in,
/// at most once per session.
pub struct App<C: Clock, S: Scheduler, O: SessionObserver, T: TextSource> {
    config: Config,
    texts: T,
    auth: MockAuth,
    leaderboard: LeaderboardStore,
    session: TypingSession<C, S, O>,
    last_report: Option<FinalReport>,
}

impl<C: Clock, S: Scheduler, O: SessionObserver, T: TextSource> App<C, S, O, T> {
    /// Builds the app around `session`. Fails if `config` is invalid.
    pub fn new(config: Config, texts: T, session: TypingSession<C, S, O>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            leaderboard: LeaderboardStore::new(config.leaderboard_size),
            config,
            texts,
            auth: MockAuth::new(),
            session,
            last_report: None,
        })
    }

    /// Replaces the leaderboard. Its bound becomes the configured size.
    pub fn with_leaderboard(mut self, leaderboard: LeaderboardStore) -> Self {
        self.config.leaderboard_size = leaderboard.max_size();
        self.leaderboard = leaderboard;
        self
    }

    /// Starts a session on a fresh text from the configured category.
    pub fn start_test(&mut self) -> Result<()> {
        let text = self.texts.pick_text(self.config.category)?;
        self.session.start(text, self.config.time_limit_secs)?;
        self.last_report = None;
        Ok(())
    }

    /// Start/stop button: stops a running session, otherwise starts one.
    pub fn toggle(&mut self) -> Result<Option<FinalReport>> {
        if self.session.is_running() {
            return Ok(self.stop());
        }
        self.start_test()?;
        Ok(None)
    }

    pub fn stop(&mut self) -> Option<FinalReport> {
        let report = self.session.stop();
        self.settle(report)
    }

    pub fn handle_input(&mut self, typed: &str) -> Option<FinalReport> {
        let report = self.session.on_input(typed);
        self.settle(report)
    }

    pub fn handle_tick(&mut self, handle: TimerHandle) -> Option<FinalReport> {
        let report = self.session.on_tick(handle);
        self.settle(report)
    }

    pub fn pump_timers(&mut self) -> Option<FinalReport> {
        let report = self.session.pump();
        self.settle(report)
    }

    pub fn dispatch(&mut self, event: HostEvent) -> Option<FinalReport> {
        match event {
            HostEvent::Input(typed) => self.handle_input(&typed),
            HostEvent::Stop => self.stop(),
            HostEvent::Tick => self.pump_timers(),
        }
    }

    fn settle(&mut self, report: Option<FinalReport>) -> Option<FinalReport> {
        let report = report?;
        if let Some(user) = self.auth.current_user() {
            let entry = LeaderboardEntry::new(
                user.name.clone(),
                report.metrics.wpm,
                report.metrics.accuracy,
            );
            self.leaderboard.insert(entry);
            tracing::info!(
                name = %user.name,
                wpm = report.metrics.wpm,
                "score recorded on leaderboard"
            );
        }
        self.last_report = Some(report.clone());
        Some(report)
    }

    /// Changes the limit used by the next session.
    pub fn set_time_limit(&mut self, seconds: u32) -> Result<()> {
        if seconds == 0 {
            return Err(Error::InvalidTimeLimit { seconds });
        }
        if self.session.is_running() {
            return Err(Error::SessionActive);
        }
        self.config.time_limit_secs = seconds;
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) {
        self.config.category = category;
    }

    /// Countdown text: the configured limit while idle, else what's left.
    pub fn timer_display(&self) -> String {
        match self.session.status() {
            SessionStatus::Idle => format_clock(self.config.time_limit_secs),
            _ => self.session.state().clock.display(),
        }
    }

    pub fn completion_message(&self) -> Option<String> {
        self.last_report
            .as_ref()
            .map(|r| completion_message(r.metrics.wpm, r.metrics.accuracy))
    }

    pub fn filter_leaderboard(&self, key: &str) -> Result<Vec<LeaderboardEntry>> {
        self.leaderboard.filter(key)
    }

    pub fn leaderboard(&self) -> &LeaderboardStore {
        &self.leaderboard
    }

    pub fn auth(&self) -> &MockAuth {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut MockAuth {
        &mut self.auth
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &TypingSession<C, S, O> {
        &self.session
    }

    pub fn last_report(&self) -> Option<&FinalReport> {
        self.last_report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::passages::FixedText;
    use crate::runtime::{ManualClock, ManualScheduler};
    use crate::session::FinishReason;
    use assert_matches::assert_matches;
    use std::time::Duration;

    type TestApp = App<ManualClock, ManualScheduler, EventLog, FixedText>;

    fn app(text: &str) -> TestApp {
        let session =
            TypingSession::new(ManualClock::new(), ManualScheduler::new(), EventLog::new());
        App::new(Config::default(), FixedText(text.to_string()), session).unwrap()
    }

    #[test]
    fn test_start_uses_config() {
        let mut app = app("cat");
        app.set_time_limit(30).unwrap();
        app.start_test().unwrap();

        let state = app.session().state();
        assert_eq!(state.reference, "cat");
        assert_eq!(state.time_limit_seconds(), 30);
        assert_eq!(app.timer_display(), "0:30");
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let mut app = app("");
        assert_matches!(app.start_test(), Err(Error::EmptyReference));
        assert_eq!(app.session().status(), SessionStatus::Idle);
    }

    #[test]
    fn test_toggle_starts_then_stops() {
        let mut app = app("cat");
        assert!(app.toggle().unwrap().is_none());
        assert!(app.session().is_running());

        let report = app.toggle().unwrap().unwrap();
        assert_eq!(report.reason, FinishReason::Stopped);
        assert_eq!(app.session().status(), SessionStatus::Finished);
    }

    #[test]
    fn test_guest_scores_are_not_recorded() {
        let mut app = app("cat");
        app.start_test().unwrap();
        assert!(app.handle_input("cat").is_some());
        assert!(app.leaderboard().is_empty());
        assert!(app.completion_message().is_some());
    }

    #[test]
    fn test_signed_in_score_recorded_once() {
        let mut app = app("cat");
        app.auth_mut().login("ada@example.com", "pw").unwrap();
        app.start_test().unwrap();
        app.session().clock().advance(Duration::from_secs(6));

        assert!(app.handle_input("cat").is_some());
        assert!(app.stop().is_none());
        assert!(app.handle_input("cat").is_none());

        let entries = app.leaderboard().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ada");
        assert_eq!(entries[0].wpm, 6);
        assert_eq!(entries[0].accuracy, 100);
    }

    #[test]
    fn test_time_limit_change_rejected_while_running() {
        let mut app = app("cat");
        assert_matches!(
            app.set_time_limit(0),
            Err(Error::InvalidTimeLimit { seconds: 0 })
        );
        app.start_test().unwrap();
        assert_matches!(app.set_time_limit(15), Err(Error::SessionActive));
        assert_eq!(app.config().time_limit_secs, 60);
    }

    #[test]
    fn test_idle_timer_display_follows_config() {
        let mut app = app("cat");
        assert_eq!(app.timer_display(), "1:00");
        app.set_time_limit(125).unwrap();
        assert_eq!(app.timer_display(), "2:05");
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut app = app("cat");
        app.start_test().unwrap();
        assert!(app.dispatch(HostEvent::Input("ca".into())).is_none());
        assert_eq!(app.session().state().typed_length, 2);
        assert!(app.dispatch(HostEvent::Tick).is_none());

        let report = app.dispatch(HostEvent::Stop).unwrap();
        assert_eq!(report.typed_length, 2);
        assert_eq!(app.last_report(), Some(&report));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let session =
            TypingSession::new(ManualClock::new(), ManualScheduler::new(), EventLog::new());
        let config = Config {
            leaderboard_size: 0,
            ..Config::default()
        };
        assert_matches!(
            App::new(config, FixedText("cat".into()), session).err(),
            Some(Error::InvalidConfig(_))
        );
    }

    #[test]
    fn test_replacement_leaderboard_keeps_its_bound() {
        let mut app = app("cat").with_leaderboard(LeaderboardStore::with_sample_entries(6));
        assert_eq!(app.config().leaderboard_size, 6);
        app.auth_mut().login("ada@example.com", "pw").unwrap();

        for _ in 0..3 {
            app.start_test().unwrap();
            assert!(app.handle_input("cat").is_some());
        }

        assert_eq!(app.leaderboard().len(), 6);
        assert_eq!(app.leaderboard().entries()[0].name, "ada");
    }

    #[test]
    fn test_category_applies_to_next_start() {
        let mut app = app("cat");
        app.set_category(Category::Wisdom);
        assert_eq!(app.config().category, Category::Wisdom);
    }
}
