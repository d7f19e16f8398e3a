use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use news_core::{AppState, RecordMap};

const RECORDS: usize = 500;
const READERS: usize = 8;

fn full_mapping() -> RecordMap {
    (0..RECORDS)
        .map(|i| (format!("Headline {i:04}"), format!("details {i}")))
        .collect()
}

#[test]
fn readers_never_observe_a_partial_publish() {
    let state = Arc::new(AppState::in_memory());
    let expected: BTreeSet<String> = full_mapping().into_keys().collect();
    let expected = Arc::new(expected);
    let done = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(READERS + 1));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let state = Arc::clone(&state);
            let expected = Arc::clone(&expected);
            let done = Arc::clone(&done);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                let mut seen_ready = false;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    let ready = state.is_ready();
                    assert!(!(seen_ready && !ready), "readiness went back to false");
                    seen_ready |= ready;

                    let titles = state.list_titles();
                    if ready {
                        // Flag seen before the lock: the mapping must be complete.
                        assert_eq!(titles.len(), RECORDS);
                    }
                    assert!(
                        titles.is_empty() || titles.len() == RECORDS,
                        "observed {} titles",
                        titles.len()
                    );
                    if !titles.is_empty() {
                        let set: BTreeSet<String> = titles.into_iter().collect();
                        assert_eq!(&set, expected.as_ref());
                    }

                    let hits = state.search("headline");
                    assert!(hits.is_empty() || hits.len() == RECORDS);

                    if finished {
                        break;
                    }
                }
                assert!(seen_ready);
            })
        })
        .collect();

    start.wait();
    state.records().publish(full_mapping()).unwrap();
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    assert_eq!(state.record_count(), RECORDS);
}

#[test]
fn favorites_mutated_while_listed_from_other_threads() {
    let state = Arc::new(AppState::in_memory());
    state.records().publish(full_mapping()).unwrap();

    let writer = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for i in 0..200 {
                let title = format!("Headline {i:04}");
                state.toggle_favorite(&title).unwrap();
                if i % 2 == 0 {
                    state.remove_favorite(&title);
                }
            }
        })
    };
    let reader = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for _ in 0..200 {
                let favorites = state.favorites();
                let unique: BTreeSet<&String> = favorites.iter().collect();
                assert_eq!(unique.len(), favorites.len(), "duplicate favorite");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(state.favorites().len(), 100);
}
