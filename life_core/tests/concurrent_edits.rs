//! Integration tests for sharing one grid between an editor, a renderer and
//! the tick loop.
//!
//! Covers:
//! - edits interleaved with steps never expose a non-binary cell
//! - an edit acknowledged before the next step is visible until that step
//! - an edit issued during a step waits for it and then applies
//! - the tick loop keeps running while a blocking editor hammers the grid
//! - a stop issued while a step waits on the lock ends after exactly that step

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use std::time::Duration;

use life_core::{ALIVE, DEAD, Guard, TickLoop, TickState, patterns};

const SIZE: i32 = 32;

#[test]
fn edits_and_steps_never_tear() {
    let guard = Guard::create(SIZE, SIZE).unwrap();
    guard.seed_random(7);
    let done = Arc::new(AtomicBool::new(false));

    let stepper = {
        let guard = guard.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                guard.step();
            }
        })
    };

    let renderer = {
        let guard = guard.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                let ok = guard.with_grid(|g| {
                    g.cells().len() == g.width() * g.height()
                        && g.cells().iter().all(|&c| c <= ALIVE)
                });
                assert!(ok, "renderer saw a malformed grid");
            }
        })
    };

    for i in 0..5_000 {
        let (x, y) = (i % SIZE, (i / SIZE) % SIZE);
        let before = guard.generation();
        guard.set_cell(x, y, ALIVE).unwrap();

        // No step between the edit and this read means the edit must show
        let (generation, value) = guard.with_grid(|g| (g.generation(), g.get_cell(x, y).unwrap()));
        if generation == before {
            assert_eq!(value, ALIVE, "edit at ({x}, {y}) was dropped");
        }
        assert!(value == ALIVE || value == DEAD);
    }

    done.store(true, Ordering::Relaxed);
    stepper.join().unwrap();
    renderer.join().unwrap();
    assert!(guard.generation() > 0);
}

#[test]
fn edit_during_step_applies_after_it() {
    let guard = Guard::create(SIZE, SIZE).unwrap();
    let holding = Arc::new(Barrier::new(2));
    let (release_tx, release_rx) = mpsc::channel::<()>();

    // Stand-in for a long step: hold the lock until told to let go
    let holder = {
        let guard = guard.clone();
        let holding = Arc::clone(&holding);
        thread::spawn(move || {
            guard.with_grid(|_| {
                holding.wait();
                release_rx.recv().unwrap();
            });
        })
    };
    holding.wait();

    let (applied_tx, applied_rx) = mpsc::channel();
    let editor = {
        let guard = guard.clone();
        thread::spawn(move || {
            guard.set_cell(3, 3, ALIVE).unwrap();
            applied_tx.send(()).unwrap();
        })
    };

    assert!(
        applied_rx.recv_timeout(Duration::from_millis(50)).is_err(),
        "edit went through while the grid was locked"
    );
    release_tx.send(()).unwrap();
    applied_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    holder.join().unwrap();
    editor.join().unwrap();
    assert_eq!(guard.get_cell(3, 3).unwrap(), ALIVE);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tick_loop_with_thread_editor() {
    let guard = Guard::create(SIZE, SIZE).unwrap();
    guard.seed_pattern(patterns::find("Glider").unwrap());
    let tick = TickLoop::on_current_runtime(guard.clone(), Duration::from_millis(1));
    tick.start();

    let editor = {
        let guard = guard.clone();
        tokio::task::spawn_blocking(move || {
            for i in 0..500 {
                let x = i % SIZE;
                guard.set_cell(x, 0, ALIVE).unwrap();
                guard.set_cell(x, 0, DEAD).unwrap();
            }
        })
    };
    editor.await.unwrap();

    while tick.ticks() < 5 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    tick.stop();
    while tick.state() != TickState::Idle {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(guard.generation(), tick.ticks());
    assert!(guard.with_grid(|g| g.cells().iter().all(|&c| c <= ALIVE)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_while_step_is_blocked_finishes_that_step() {
    let guard = Guard::create(SIZE, SIZE).unwrap();
    guard.seed_pattern(patterns::find("Glider").unwrap());
    let holding = Arc::new(Barrier::new(2));
    let (release_tx, release_rx) = mpsc::channel::<()>();

    // An editor holds the grid so the loop's first step blocks on the lock
    let holder = {
        let guard = guard.clone();
        let holding = Arc::clone(&holding);
        thread::spawn(move || {
            guard.with_grid(|g| {
                let generation = g.generation();
                holding.wait();
                release_rx.recv().unwrap();
                generation
            })
        })
    };
    holding.wait();

    let tick = TickLoop::on_current_runtime(guard.clone(), Duration::from_millis(1));
    tick.start();
    tokio::time::sleep(Duration::from_millis(20)).await;

    tick.stop();
    assert_eq!(tick.state(), TickState::Stopping);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(tick.is_running(), "loop finished while its step was still blocked");
    assert_eq!(tick.ticks(), 0);

    release_tx.send(()).unwrap();
    let before = holder.join().unwrap();
    while tick.is_running() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(guard.generation(), before + 1);
    assert_eq!(tick.ticks(), 1);
}
