//! Messages from the control thread to the playback callback.

#[derive(Debug)]
pub enum PlaybackCommand {
    /// Queue interleaved samples at the device channel count.
    Samples(Vec<f32>),

    /// Output gain, 0.0 to 1.0.
    SetVolume(f32),

    /// Drop everything queued.
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::{
        traits::{Consumer, Producer, Split},
        HeapRb,
    };

    #[test]
    fn commands_arrive_in_order() {
        let rb = HeapRb::<PlaybackCommand>::new(8);
        let (mut prod, mut cons) = rb.split();

        prod.try_push(PlaybackCommand::Stop).unwrap();
        prod.try_push(PlaybackCommand::Samples(vec![0.25, -0.25]))
            .unwrap();
        prod.try_push(PlaybackCommand::SetVolume(0.5)).unwrap();

        assert!(matches!(cons.try_pop(), Some(PlaybackCommand::Stop)));
        match cons.try_pop() {
            Some(PlaybackCommand::Samples(data)) => assert_eq!(data, vec![0.25, -0.25]),
            other => panic!("expected Samples, got {other:?}"),
        }
        assert!(matches!(
            cons.try_pop(),
            Some(PlaybackCommand::SetVolume(_))
        ));
        assert!(cons.try_pop().is_none());
    }
}
