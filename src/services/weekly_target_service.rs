use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Datelike, Duration, Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::db::repositories::weekly_target_repository::WeeklyTargetRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::habit::Habit;
use crate::models::weekly_target::{WeeklyStatus, WeeklyTargetData};
use crate::services::habit_service::HabitService;

const MIN_TARGET: u32 = 1;
const MAX_TARGET: u32 = 7;
const CELEBRATION_TTL: StdDuration = StdDuration::from_secs(5);
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tracks the days-per-week target over the habit collection. The
/// caller re-runs `refresh` after every habit or target mutation; there
/// is no hidden observer graph. Accomplished weeks are recorded at most
/// once regardless of how often the week is re-evaluated.
pub struct WeeklyTargetService {
    db: DbPool,
    habit_service: Arc<HabitService>,
    celebration: Arc<AtomicBool>,
    celebration_timer: Mutex<Option<Sender<()>>>,
    celebration_ttl: StdDuration,
}

impl WeeklyTargetService {
    pub fn new(db: DbPool, habit_service: Arc<HabitService>) -> Self {
        Self {
            db,
            habit_service,
            celebration: Arc::new(AtomicBool::new(false)),
            celebration_timer: Mutex::new(None),
            celebration_ttl: CELEBRATION_TTL,
        }
    }

    #[cfg(test)]
    fn with_celebration_ttl(mut self, ttl: StdDuration) -> Self {
        self.celebration_ttl = ttl;
        self
    }

    pub fn get(&self) -> AppResult<WeeklyTargetData> {
        self.db.with_connection(WeeklyTargetRepository::load)
    }

    pub fn set_target(&self, target: u32) -> AppResult<WeeklyTargetData> {
        if !(MIN_TARGET..=MAX_TARGET).contains(&target) {
            return Err(AppError::validation("每周目标需在 1 到 7 天之间"));
        }

        let data = self.db.with_connection(|conn| {
            let mut data = WeeklyTargetRepository::load(conn)?;
            data.target = Some(target);
            WeeklyTargetRepository::save(conn, &data)?;
            Ok(data)
        })?;

        info!(days_per_week = target, "weekly target set");
        Ok(data)
    }

    /// Re-evaluates the current week against the habit collection and
    /// records the accomplishment when the target is first met.
    pub fn refresh(&self) -> AppResult<WeeklyStatus> {
        self.refresh_at(Local::now().date_naive())
    }

    /// Evaluation anchored at an explicit day; `refresh` uses the local
    /// calendar day.
    pub fn refresh_at(&self, today: NaiveDate) -> AppResult<WeeklyStatus> {
        let habits = self.habit_service.list()?;
        let daily_completions = daily_completions(&habits, today);
        let completed_days = daily_completions.values().filter(|done| **done).count() as u32;
        let week_id = week_identifier(today);

        let mut data = self.get()?;
        let is_target_met = data
            .target
            .map(|target| completed_days >= target)
            .unwrap_or(false);

        let mut newly_accomplished = false;
        // An empty collection meets any target vacuously; only a
        // non-empty week is ever recorded.
        if is_target_met && !habits.is_empty() && !data.accomplishments.contains(&week_id) {
            data.accomplishments.push(week_id.clone());
            self.db
                .with_connection(|conn| WeeklyTargetRepository::save(conn, &data))?;
            self.raise_celebration();
            newly_accomplished = true;
            info!(week_id = %week_id, completed_days, "weekly target accomplished");
        } else {
            debug!(
                week_id = %week_id,
                completed_days,
                is_target_met,
                "weekly target evaluated"
            );
        }

        Ok(WeeklyStatus {
            week_id,
            daily_completions,
            completed_days,
            target: data.target,
            is_target_met,
            newly_accomplished,
            celebrating: self.is_celebrating(),
        })
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.load(Ordering::SeqCst)
    }

    /// Cancels the pending timer and lowers the flag immediately.
    pub fn clear_celebration(&self) {
        if let Ok(mut guard) = self.celebration_timer.lock() {
            guard.take();
        }
        self.celebration.store(false, Ordering::SeqCst);
    }

    fn raise_celebration(&self) {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        if let Ok(mut guard) = self.celebration_timer.lock() {
            // Dropping the previous sender wakes and retires its timer.
            *guard = Some(cancel_tx);
        }

        self.celebration.store(true, Ordering::SeqCst);

        let flag = Arc::clone(&self.celebration);
        let ttl = self.celebration_ttl;
        let spawned = thread::Builder::new()
            .name("celebration-timer".to_string())
            .spawn(move || match cancel_rx.recv_timeout(ttl) {
                Err(RecvTimeoutError::Timeout) => flag.store(false, Ordering::SeqCst),
                // Cancelled or replaced by a newer celebration.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            });

        if let Err(error) = spawned {
            warn!(error = %error, "failed to start celebration timer, lowering flag now");
            self.celebration.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for WeeklyTargetService {
    fn drop(&mut self) {
        self.clear_celebration();
    }
}

/// Maps every date of the Monday-start week containing `today` to
/// whether each habit in the collection completed it. With no habits
/// every day reports complete (universal quantification over an empty
/// set); callers guard recording against that case.
fn daily_completions(habits: &[Habit], today: NaiveDate) -> BTreeMap<String, bool> {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (0..7)
        .map(|offset| {
            let key = (monday + Duration::days(offset))
                .format(DATE_FORMAT)
                .to_string();
            let all_done = habits.iter().all(|habit| habit.is_completed_on(&key));
            (key, all_done)
        })
        .collect()
}

/// Week ids use a Sunday-anchored approximation kept from earlier
/// releases, not ISO 8601 week numbering; recorded accomplishments key
/// on it.
pub fn week_identifier(date: NaiveDate) -> String {
    let jan_first_weekday = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|jan_first| i64::from(jan_first.weekday().num_days_from_sunday()))
        .unwrap_or(0);
    let past_days = i64::from(date.ordinal0());
    let week = (past_days + jan_first_weekday + 1) / 7 + 1;
    format!("{}-W{}", date.year(), week)
}
