//! Registry and hook behavior across threads
//!
//! A worker thread pushes sounds while another thread renders, the way the
//! sort worker and the audio callback share one registry.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use sortscope_core::array::{AccessHooks, ArrayAccess, Fill, InstrumentedArray};
use sortscope_core::sound::{SoundRegistry, Waveform};

const SAMPLE_RATE: u32 = 44100;
const PUSHES: usize = 2000;
/// 0.001 s at 44.1 kHz rounds up to 45 samples
const SHORT_DURATION: f32 = 0.001;
const SHORT_SAMPLES: usize = 45;

#[test]
fn test_push_while_rendering() {
    let registry = Arc::new(SoundRegistry::with_sample_rate(SAMPLE_RATE));
    let done = Arc::new(AtomicBool::new(false));

    let renderer = {
        let registry = Arc::clone(&registry);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut rendered = 0usize;
            while !done.load(Ordering::Acquire) {
                registry.render_one_sample();
                rendered += 1;
            }
            rendered
        })
    };

    let worker = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..PUSHES {
                let waveform = Waveform::ALL[i % Waveform::ALL.len()];
                let value = (i % 100) as f32 / 100.0;
                registry.push(waveform, 0.01, value, SHORT_DURATION);
            }
        })
    };

    worker.join().unwrap();
    done.store(true, Ordering::Release);
    let rendered = renderer.join().unwrap();
    println!("Rendered {} samples while pushing {} events", rendered, PUSHES);

    // Every event still alive is younger than its length, so this drains it
    for _ in 0..SHORT_SAMPLES {
        registry.render_one_sample();
    }
    assert!(registry.is_empty());
    assert_eq!(registry.render_one_sample(), 0);
}

#[test]
fn test_many_pushers_one_renderer() {
    let registry = Arc::new(SoundRegistry::with_sample_rate(SAMPLE_RATE));

    let pushers: Vec<_> = (0..4)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..250 {
                    registry.push(Waveform::Sine, 0.1, (t * 250 + i) as f32 / 1000.0, 1.0);
                }
            })
        })
        .collect();

    for _ in 0..1000 {
        registry.render_one_sample();
    }
    for pusher in pushers {
        pusher.join().unwrap();
    }

    // One second events cannot have expired after a thousand samples
    assert_eq!(registry.len(), 1000);
    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_hooks_feed_registry_from_worker_thread() {
    let registry = Arc::new(SoundRegistry::with_sample_rate(SAMPLE_RATE));
    let hooks = Arc::new(AccessHooks::new());
    let writes = Arc::new(AtomicUsize::new(0));

    {
        let registry = Arc::clone(&registry);
        hooks.set_read_hook(move |array: &InstrumentedArray, index: usize| {
            let value = array.as_slice()[index] as f32 / array.len() as f32;
            registry.push(Waveform::Sine, 0.1, value, 0.5);
        });
    }
    {
        let writes = Arc::clone(&writes);
        hooks.set_write_hook(move |_: &InstrumentedArray, _: usize| {
            writes.fetch_add(1, Ordering::Relaxed);
        });
    }

    let worker = {
        let hooks = Arc::clone(&hooks);
        thread::spawn(move || {
            let mut array = InstrumentedArray::with_hooks(32, Fill::Identity, hooks);
            array.reverse().unwrap();
            array
        })
    };

    for _ in 0..256 {
        registry.render_one_sample();
    }
    let array = worker.join().unwrap();

    assert_eq!(array.as_slice()[0], 31);
    assert_eq!(writes.load(Ordering::Relaxed), 32);
    // Each of the 16 swaps reads twice; half a second outlives the render loop
    assert_eq!(registry.len(), 32);
}

#[test]
fn test_independent_arrays_do_not_share_hooks() {
    let first_reads = Arc::new(AtomicUsize::new(0));
    let second_reads = Arc::new(AtomicUsize::new(0));

    let first_hooks = Arc::new(AccessHooks::new());
    let second_hooks = Arc::new(AccessHooks::new());
    {
        let counter = Arc::clone(&first_reads);
        first_hooks.set_read_hook(move |_: &InstrumentedArray, _: usize| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }
    {
        let counter = Arc::clone(&second_reads);
        second_hooks.set_read_hook(move |_: &InstrumentedArray, _: usize| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }

    let handles: Vec<_> = [(first_hooks, 10usize), (second_hooks, 3usize)]
        .into_iter()
        .map(|(hooks, reads)| {
            thread::spawn(move || {
                let array = InstrumentedArray::with_hooks(4, Fill::Identity, hooks);
                for i in 0..reads {
                    array.get(i % 4).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(first_reads.load(Ordering::Relaxed), 10);
    assert_eq!(second_reads.load(Ordering::Relaxed), 3);
}
