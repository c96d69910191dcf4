//! Timed tasks with explicit start and stop.
//!
//! A task runs for a fixed duration while the owner ticks it. It can be
//! cancelled at any point; cancellation and natural completion are distinct
//! end states so the owner knows whether to run its cleanup path.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TimedTask {
    duration: Duration,
    elapsed: Duration,
    state: TaskState,
}

impl TimedTask {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            state: TaskState::Idle,
        }
    }

    /// Start (or restart) the countdown.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.state = TaskState::Running;
    }

    /// Cancel a running task. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        if self.state == TaskState::Running {
            self.state = TaskState::Cancelled;
            true
        } else {
            false
        }
    }

    /// Advance by `dt`. Returns true on the tick the task finishes.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.state != TaskState::Running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.state = TaskState::Finished;
            return true;
        }
        false
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    /// Finished or cancelled.
    pub fn is_done(&self) -> bool {
        matches!(self.state, TaskState::Finished | TaskState::Cancelled)
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_to_completion() {
        let mut task = TimedTask::new(Duration::from_secs(10));
        assert_eq!(task.state(), TaskState::Idle);
        assert!(!task.tick(Duration::from_secs(1)));

        task.start();
        assert!(!task.tick(Duration::from_secs(4)));
        assert!((task.progress() - 0.4).abs() < 1e-6);
        assert!(task.tick(Duration::from_secs(6)));
        assert_eq!(task.state(), TaskState::Finished);
        assert!(!task.tick(Duration::from_secs(1)));
        assert_eq!(task.remaining(), Duration::ZERO);
    }

    #[test]
    fn stop_cancels_only_running_tasks() {
        let mut task = TimedTask::new(Duration::from_secs(2));
        assert!(!task.stop());
        task.start();
        assert!(task.stop());
        assert_eq!(task.state(), TaskState::Cancelled);
        assert!(task.is_done());
        assert!(!task.tick(Duration::from_secs(5)));
    }

    #[test]
    fn restart_resets_elapsed() {
        let mut task = TimedTask::new(Duration::from_secs(3));
        task.start();
        task.tick(Duration::from_secs(2));
        task.start();
        assert_eq!(task.remaining(), Duration::from_secs(3));
    }
}
