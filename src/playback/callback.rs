//! Playback callback, run on the cpal audio thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

use super::command::PlaybackCommand;

/// Audio-thread state. Only touched from inside the cpal callback.
pub struct PlaybackCallback {
    consumer: HeapCons<PlaybackCommand>,
    queue: VecDeque<f32>,
    volume: f32,
    /// Interleaved samples still queued, visible to the control thread.
    pending: Arc<AtomicUsize>,
}

impl PlaybackCallback {
    /// Callback reading commands from `consumer` and publishing its queue
    /// depth through `pending`.
    pub fn new(consumer: HeapCons<PlaybackCommand>, pending: Arc<AtomicUsize>) -> Self {
        Self {
            consumer,
            queue: VecDeque::new(),
            volume: 1.0,
            pending,
        }
    }

    /// Fill `output` from the queue, clamped to [-1, 1]; silence on underrun.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.consumer.try_pop() {
            self.apply(cmd);
        }

        for out in output.iter_mut() {
            *out = self
                .queue
                .pop_front()
                .map_or(0.0, |s| (s * self.volume).clamp(-1.0, 1.0));
        }
        self.pending.store(self.queue.len(), Ordering::Release);
    }

    fn apply(&mut self, cmd: PlaybackCommand) {
        match cmd {
            PlaybackCommand::Samples(data) => self.queue.extend(data),
            PlaybackCommand::SetVolume(v) => self.volume = v.clamp(0.0, 1.0),
            PlaybackCommand::Stop => self.queue.clear(),
        }
    }
}
