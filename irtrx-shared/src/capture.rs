use heapless::spsc::Consumer;

use crate::pulse::RawPulseTrain;
use crate::timing::GAP_TICKS;

/// Level of the receiver input at tick `ts`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Sample {
    pub mark: bool,
    pub ts: u32,
}

impl Sample {
    pub fn new(mark: bool, ts: u32) -> Self {
        Sample { mark, ts }
    }
}

/// Producer side of the capture path, drained by the poll loop
pub trait EdgeSource {
    fn next_sample(&mut self) -> Option<Sample>;
}

impl<'a, const N: usize> EdgeSource for Consumer<'a, Sample, N> {
    fn next_sample(&mut self) -> Option<Sample> {
        self.dequeue()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum State {
    Idle,
    Receiving,
    FrameComplete,
    Overflow,
}

/// Turns receiver level samples into a [`RawPulseTrain`].
///
/// A frame starts on a mark that follows more than `GAP_TICKS` of idle line.
/// It ends when a space grows longer than the gap, either seen through an
/// idle sample or through the next mark, or overflows when the buffer fills.
/// `FrameComplete` and `Overflow` hold the train until [`EdgeDetector::reset`]
/// while the line level keeps being tracked, so a frame whose first mark
/// arrived in the meantime is still captured after the reset.
pub struct EdgeDetector {
    state: State,
    train: RawPulseTrain,
    mark: bool,
    last_edge: u32,
    /// No edge seen yet, the line counts as idle
    quiet: bool,
    /// A mark following a full gap arrived while a frame was held
    pending: bool,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            train: RawPulseTrain::new(),
            mark: false,
            last_edge: 0,
            quiet: true,
            pending: false,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// A frame is waiting to be decoded
    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::FrameComplete | State::Overflow)
    }

    /// The captured train, once the frame is complete or has overflowed
    pub fn frame(&self) -> Option<&RawPulseTrain> {
        if self.is_ready() {
            Some(&self.train)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.train.clear();
    }

    pub fn sample(&mut self, mark: bool, ts: u32) -> State {
        match self.state {
            State::Idle if self.pending && mark != self.mark => {
                self.pending = false;
                self.state = State::Receiving;
                self.push_edge(mark, ts);
            }
            State::Idle => {
                if mark && self.idle_for_gap(ts) {
                    self.state = State::Receiving;
                }
                self.track(mark, ts);
            }
            State::Receiving if mark == self.mark => {
                if !mark && self.idle_for_gap(ts) {
                    self.complete();
                }
            }
            State::Receiving if mark && self.idle_for_gap(ts) => {
                self.complete();
                self.pending = true;
                self.track(mark, ts);
            }
            State::Receiving => self.push_edge(mark, ts),
            State::FrameComplete | State::Overflow => {
                if mark != self.mark {
                    self.pending = mark && self.idle_for_gap(ts);
                    self.track(mark, ts);
                }
            }
        }

        self.state
    }

    /// Line has been in space for longer than the gap at `ts`
    fn idle_for_gap(&self, ts: u32) -> bool {
        !self.mark && (self.quiet || ts.wrapping_sub(self.last_edge) > GAP_TICKS)
    }

    /// Record the duration of the level that ends at `ts`
    fn push_edge(&mut self, mark: bool, ts: u32) {
        let dt = ts.wrapping_sub(self.last_edge);
        let ticks = dt.min(u32::from(u16::MAX)) as u16;

        if self.train.push(ticks).is_err() || self.train.overflow() {
            log::debug!("Capture overflow");
            self.state = State::Overflow;
        }

        self.track(mark, ts);
    }

    fn track(&mut self, mark: bool, ts: u32) {
        if mark != self.mark {
            self.mark = mark;
            self.last_edge = ts;
            self.quiet = false;
        }
    }

    fn complete(&mut self) {
        log::debug!("Frame complete, {} pulses", self.train.len());
        self.state = State::FrameComplete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::RAWBUF;

    fn feed(detector: &mut EdgeDetector, durations: &[u32]) -> u32 {
        let mut ts = 1000;
        let mut mark = true;
        for d in durations {
            detector.sample(mark, ts);
            ts += d;
            mark = !mark;
        }
        detector.sample(mark, ts);
        ts
    }

    #[test]
    fn captures_frame() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.state(), State::Idle);

        let ts = feed(&mut detector, &[180, 90, 11, 11, 11]);
        assert_eq!(detector.state(), State::Receiving);
        assert!(detector.frame().is_none());

        // Space still within the gap
        detector.sample(false, ts + GAP_TICKS);
        assert_eq!(detector.state(), State::Receiving);

        detector.sample(false, ts + GAP_TICKS + 1);
        assert_eq!(detector.state(), State::FrameComplete);
        assert_eq!(detector.frame().unwrap().as_slice(), &[180, 90, 11, 11, 11]);
    }

    #[test]
    fn ignores_space_while_idle() {
        let mut detector = EdgeDetector::new();
        detector.sample(false, 10);
        detector.sample(false, 5000);
        assert_eq!(detector.state(), State::Idle);
    }

    #[test]
    fn holds_frame_until_reset() {
        let mut detector = EdgeDetector::new();
        let ts = feed(&mut detector, &[180, 90, 11]);
        detector.sample(false, ts + GAP_TICKS + 1);
        assert!(detector.is_ready());

        // Edges after completion are dropped
        detector.sample(true, ts + 500);
        detector.sample(false, ts + 520);
        assert_eq!(detector.frame().unwrap().len(), 3);

        detector.reset();
        assert_eq!(detector.state(), State::Idle);
        assert!(detector.frame().is_none());
    }

    #[test]
    fn overflows_when_full() {
        let mut detector = EdgeDetector::new();
        let durations = [10u32; RAWBUF];
        feed(&mut detector, &durations);

        assert_eq!(detector.state(), State::Overflow);
        let train = detector.frame().unwrap();
        assert!(train.overflow());
        assert_eq!(train.len(), RAWBUF);
    }

    #[test]
    fn mark_after_long_space_ends_frame() {
        let mut detector = EdgeDetector::new();
        let ts = feed(&mut detector, &[180, 90, 11, 34, 11]);
        assert_eq!(detector.state(), State::Receiving);

        // No idle sample, the next frame's header is the first thing seen
        assert_eq!(detector.sample(true, ts + 1000), State::FrameComplete);
        assert_eq!(detector.frame().unwrap().as_slice(), &[180, 90, 11, 34, 11]);

        // Its mark is already running, the space ending it resumes capture
        detector.reset();
        assert_eq!(detector.state(), State::Idle);
        assert_eq!(detector.sample(false, ts + 1180), State::Receiving);
        detector.sample(true, ts + 1270);
        detector.sample(false, ts + 1281);
        assert_eq!(detector.sample(true, ts + 2000), State::FrameComplete);
        assert_eq!(detector.frame().unwrap().as_slice(), &[180, 90, 11]);
    }

    #[test]
    fn mark_needs_idle_line_first() {
        let mut detector = EdgeDetector::new();
        let mut ts = 1000;
        let mut mark = true;
        let mut overflows = 0;

        // One burst, longer than the buffer, rearmed as soon as it overflows
        for _ in 0..149 {
            if detector.sample(mark, ts) == State::Overflow {
                overflows += 1;
                detector.reset();
            }
            ts += 10;
            mark = !mark;
        }
        detector.sample(mark, ts);
        assert_eq!(overflows, 1);
        assert_eq!(detector.state(), State::Idle);

        detector.sample(false, ts + GAP_TICKS + 1);
        assert_eq!(detector.state(), State::Idle);

        detector.sample(true, ts + 2 * GAP_TICKS);
        assert_eq!(detector.state(), State::Receiving);
    }

    #[test]
    fn drains_spsc_queue() {
        let mut queue: heapless::spsc::Queue<Sample, 4> = heapless::spsc::Queue::new();
        let (mut producer, mut consumer) = queue.split();
        producer.enqueue(Sample::new(true, 1)).unwrap();
        producer.enqueue(Sample::new(false, 2)).unwrap();

        assert_eq!(consumer.next_sample(), Some(Sample::new(true, 1)));
        assert_eq!(consumer.next_sample(), Some(Sample::new(false, 2)));
        assert_eq!(consumer.next_sample(), None);
    }
}
