// Typing-speed trainer core: scoring, countdown sessions and leaderboard.
// Presentation lives in the host shell, which feeds input and timer firings in
// and receives progress through a SessionObserver.
pub mod app;
pub mod app_dirs;
pub mod auth;
pub mod clock;
pub mod comparator;
pub mod config;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod metrics;
pub mod passages;
pub mod report;
pub mod runtime;
pub mod session;
pub mod typing;
pub mod util;

pub use app::App;
pub use error::{Error, Result};
pub use events::{FinalReport, Progress, SessionObserver, TimerUpdate};
pub use metrics::Metrics;
pub use typing::TypingSession;
