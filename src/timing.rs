use std::collections::VecDeque;
use std::time::Duration;

/// frames kept in the rolling averages
pub const FRAME_WINDOW: usize = 60;

/// Rolling window of recent frame timings.
///
/// `work` is the time spent casting and drawing, `total` the whole loop
/// iteration including the sleep that caps the frame rate.
#[derive(Clone, Debug)]
pub struct FrameTimes {
    window: usize,
    work: VecDeque<Duration>,
    total: VecDeque<Duration>,
}

impl Default for FrameTimes {
    fn default() -> Self {
        Self::new(FRAME_WINDOW)
    }
}

impl FrameTimes {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            work: VecDeque::with_capacity(window),
            total: VecDeque::with_capacity(window),
        }
    }

    pub fn record(&mut self, work: Duration, total: Duration) {
        for (samples, value) in [(&mut self.work, work), (&mut self.total, total)] {
            if samples.len() == self.window {
                samples.pop_front();
            }
            samples.push_back(value);
        }
    }

    pub fn len(&self) -> usize {
        self.work.len()
    }

    pub fn is_empty(&self) -> bool {
        self.work.is_empty()
    }

    /// frames per second actually delivered, sleep included
    pub fn locked_fps(&self) -> u32 {
        per_second(&self.total)
    }

    /// frames per second the cast and draw alone could sustain
    pub fn theoretical_fps(&self) -> u32 {
        per_second(&self.work)
    }
}

fn per_second(samples: &VecDeque<Duration>) -> u32 {
    if samples.is_empty() {
        return 0;
    }
    let sum: Duration = samples.iter().sum();
    let average = sum.as_secs_f64() / samples.len() as f64;
    if average > 0. {
        (1. / average).round() as u32
    } else {
        0
    }
}
