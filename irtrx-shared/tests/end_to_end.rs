use std::collections::VecDeque;
use std::fmt::{self, Write};

use heapless::spsc::Queue;

use irtrx_shared::decoder::MIN_FRAME_LEN;
use irtrx_shared::pulse::RAWBUF;
use irtrx_shared::remotes::ZAAPA_VOL_PLUS;
use irtrx_shared::{
    decode, encode_nec, Mode, Protocol, PulseEmitter, PulseSequence, RawPulseTrain, Sample,
    SerialIo, Transceiver, NEC_INIT_MASK,
};

#[derive(Default)]
struct Console {
    input: VecDeque<u8>,
    output: String,
}

impl Console {
    fn typed(text: &str) -> Self {
        Console {
            input: text.bytes().collect(),
            output: String::new(),
        }
    }
}

impl Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl SerialIo for Console {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }
}

#[derive(Default)]
struct Recorder(Vec<PulseSequence>);

impl PulseEmitter for Recorder {
    type Error = ();

    fn emit(&mut self, sequence: &PulseSequence) -> Result<(), ()> {
        self.0.push(sequence.clone());
        Ok(())
    }
}

/// Level changes of a transmitted frame, in ticks, ending on the edge back
/// to idle
fn edges(sequence: &PulseSequence, start: u32) -> Vec<Sample> {
    let train = RawPulseTrain::from_usecs(sequence.as_slice());
    let mut ts = start;
    let mut out = Vec::new();
    for (i, &ticks) in train.as_slice().iter().enumerate() {
        out.push(Sample::new(i % 2 == 0, ts));
        ts += u32::from(ticks);
    }
    out.push(Sample::new(false, ts));
    out
}

/// Frame edges followed by an idle line sample
fn samples(sequence: &PulseSequence, start: u32) -> Vec<Sample> {
    let mut out = edges(sequence, start);
    let end = out.last().map_or(start, |s| s.ts);
    out.push(Sample::new(false, end + 1000));
    out
}

#[test]
fn nec_round_trip_all_codes() {
    for code in 0..=u16::MAX {
        let sequence = encode_nec(code).unwrap();
        let signal = decode(&RawPulseTrain::from_usecs(sequence.as_slice()));

        assert_eq!(signal.protocol, Protocol::Nec, "code {:#X}", code);
        assert_eq!(signal.value, NEC_INIT_MASK | u32::from(code));
        assert_eq!(signal.bit_count, 32);
        assert!(!signal.overflow);
    }
}

#[test]
fn boundaries() {
    assert_eq!(decode(&RawPulseTrain::new()).protocol, Protocol::Unknown);

    let short = RawPulseTrain::from_ticks(&[180, 90]);
    assert!(short.len() < MIN_FRAME_LEN);
    assert_eq!(decode(&short).protocol, Protocol::Unknown);

    // A full buffer is an overflow even if it holds a valid frame prefix
    let mut pulses = RawPulseTrain::from_usecs(encode_nec(0x10EF).unwrap().as_slice())
        .as_slice()
        .to_vec();
    pulses.resize(RAWBUF, 11);
    let full = RawPulseTrain::from_ticks(&pulses);
    let signal = decode(&full);
    assert!(signal.overflow);
    assert_eq!(signal.protocol, Protocol::Unknown);
}

#[test]
fn transmit_session() {
    let console = Console::typed("ir mode tx\r\n0x10EF\r\n");
    let edges = IterSource(std::iter::empty::<Sample>());
    let mut t = Transceiver::new(console, edges, Recorder::default());

    for _ in 0..2 {
        t.poll().unwrap();
    }

    assert_eq!(t.mode(), Mode::Transmit);
    assert!(t.serial().output.ends_with("> 0x10EF\nSent code: 0x10EF\n"));

    let sent = &t.emitter().0;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], encode_nec(0x10EF).unwrap());

    let signal = decode(&RawPulseTrain::from_usecs(sent[0].as_slice()));
    assert_eq!(signal.value, 0x20DF_10EF);
}

#[test]
fn receive_session() {
    let mut queue: Queue<Sample, 256> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let frame = encode_nec(ZAAPA_VOL_PLUS).unwrap();
    for sample in samples(&frame, 10_000) {
        producer.enqueue(sample).unwrap();
    }

    let mut t = Transceiver::new(Console::default(), consumer, Recorder::default());
    t.poll().unwrap();

    let output = &t.serial().output;
    assert!(output.starts_with("Encoding  : NEC\nCode      : 20DF10EF (32 bits)\n"));
    assert!(output.contains("uint16_t  rawData[67] = {9000,4500, "));
    assert!(output.contains("uint16_t data = 0x20DF10EF;\n"));
}

#[test]
fn back_to_back_frames() {
    let mut queue: Queue<Sample, 512> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let first = samples(&encode_nec(0x30CF).unwrap(), 0);
    let next = first.last().unwrap().ts + 100;
    let second = samples(&encode_nec(0xB24D).unwrap(), next);
    for sample in first.into_iter().chain(second) {
        producer.enqueue(sample).unwrap();
    }

    let mut t = Transceiver::new(Console::default(), consumer, Recorder::default());
    t.poll().unwrap();
    t.poll().unwrap();

    let output = &t.serial().output;
    assert_eq!(output.matches("Encoding  : NEC").count(), 2);
    assert!(output.contains("Button    : ZAAPA POWER"));
    assert!(output.contains("Button    : ZAAPA MUTE"));
}

#[test]
fn frames_from_edges_only() {
    let mut queue: Queue<Sample, 256> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let first = edges(&encode_nec(0x30CF).unwrap(), 0);
    let next = first.last().unwrap().ts + 1000;
    let second = edges(&encode_nec(0xB24D).unwrap(), next);
    for sample in first.into_iter().chain(second) {
        producer.enqueue(sample).unwrap();
    }

    let mut t = Transceiver::new(Console::default(), consumer, Recorder::default());
    t.poll().unwrap();
    assert!(t.serial().output.contains("Button    : ZAAPA POWER"));

    // The second frame only ends once the line has been idle for the gap
    let end = t.serial().output.len();
    t.poll().unwrap();
    assert_eq!(t.serial().output.len(), end);

    producer.enqueue(Sample::new(true, u32::MAX / 2)).unwrap();
    t.poll().unwrap();

    let output = &t.serial().output;
    assert_eq!(output.matches("Encoding  : NEC").count(), 2);
    assert!(output.contains("Button    : ZAAPA MUTE"));
}

#[test]
fn overflowing_burst_reported_once() {
    let mut queue: Queue<Sample, 256> = Queue::new();
    let (mut producer, consumer) = queue.split();

    let mut ts = 1000;
    for i in 0..150 {
        producer.enqueue(Sample::new(i % 2 == 0, ts)).unwrap();
        ts += 11;
    }
    producer.enqueue(Sample::new(false, ts + 1000)).unwrap();

    let mut t = Transceiver::new(Console::default(), consumer, Recorder::default());
    for _ in 0..4 {
        t.poll().unwrap();
    }

    let output = &t.serial().output;
    assert_eq!(output.matches("IR code too long").count(), 1);
    assert_eq!(output.matches("rawData[").count(), 1);
    assert!(!output.contains("Encoding"));
}

/// Iterator backed edge source
struct IterSource<I>(I);

impl<I: Iterator<Item = Sample>> irtrx_shared::EdgeSource for IterSource<I> {
    fn next_sample(&mut self) -> Option<Sample> {
        self.0.next()
    }
}
