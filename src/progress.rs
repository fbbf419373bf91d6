use std::{
    io::{self, Write},
    sync::Mutex,
    time::{Duration, Instant},
};

const EMIT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Progress {
    total: u64,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    processed: u64,
    start: Instant,
    last_emit: Option<Instant>,
}

impl Progress {
    pub fn new(total: u64) -> Self {
        let state = State {
            processed: 0,
            start: Instant::now(),
            last_emit: None,
        };

        Progress {
            total,
            state: Mutex::new(state),
        }
    }

    pub fn update(&self, count: u64) {
        let mut state = self.state.lock().unwrap();
        state.processed += count;

        let now = Instant::now();
        let due = state
            .last_emit
            .map_or(true, |last| now - last >= EMIT_INTERVAL);
        if due || state.processed >= self.total {
            state.emit(self.total);
            state.last_emit = Some(now);
        }
    }

    pub fn processed(&self) -> u64 {
        self.state.lock().unwrap().processed
    }

    pub fn finish(&self) {
        if self.total > 0 {
            println!();
        }
    }
}

impl State {
    #[allow(clippy::cast_precision_loss)]
    fn emit(&self, total: u64) {
        if total == 0 {
            return;
        }

        let percent = self.processed as f64 / total as f64 * 100.0;
        let elapsed = self.start.elapsed();
        let eta = if self.processed > 0 && self.processed < total {
            let remaining = elapsed.as_secs_f64() / self.processed as f64
                * (total - self.processed) as f64;
            format!(", eta: {}", format_duration(Duration::from_secs_f64(remaining)))
        } else {
            String::new()
        };

        let mut stdout = io::stdout();
        let _ = write!(
            stdout,
            "\rprogress: {}/{} ({percent:.1}%) - elapsed: {}{eta}",
            self.processed,
            total,
            format_duration(elapsed),
        );
        let _ = stdout.flush();
    }
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    if seconds > 60.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{seconds:.0}s")
    }
}
