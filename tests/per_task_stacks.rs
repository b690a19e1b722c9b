use std::collections::HashMap;
use std::sync::Arc;

use sentaku::{PreferenceList, ResolutionStack};

fn backends() -> Arc<HashMap<String, u32>> {
    Arc::new(
        [("memory", 1), ("disk", 2), ("remote", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

fn prefs(keys: &[&str]) -> PreferenceList<String> {
    PreferenceList::try_from_iter(keys.iter().map(|k| (*k).to_string())).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_task_owns_a_forked_stack() {
    let process_default = ResolutionStack::from_elements(Some(prefs(&["remote", "disk"])));
    let offered = backends();

    let overrides = [
        vec!["memory"],
        vec!["disk", "memory"],
        vec!["nonexistent", "remote"],
        vec!["disk"],
    ];

    let mut handles = Vec::new();
    for keys in overrides {
        let mut stack = process_default.fork();
        let offered = Arc::clone(&offered);
        handles.push(tokio::spawn(async move {
            let expected = keys
                .iter()
                .find(|k| offered.contains_key(**k))
                .map(|k| (*k).to_string());

            let picked = {
                let guard = stack.push(prefs(&keys)).unwrap();
                tokio::task::yield_now().await;
                guard.choose(offered.as_ref()).unwrap().key
            };

            assert_eq!(Some(picked), expected);
            assert_eq!(stack.depth(), 1);
            stack.choose(offered.as_ref()).unwrap().key
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "remote");
    }
    assert_eq!(process_default.choose(offered.as_ref()).unwrap().key, "remote");
}

#[test]
fn stacks_move_across_threads() {
    let mut stack = ResolutionStack::from_elements(Some(prefs(&["disk"])));
    let offered = backends();

    let worker = std::thread::spawn(move || {
        let guard = stack.push_frozen("memory".to_string()).unwrap();
        let picked = guard.choose(offered.as_ref()).unwrap().key;
        drop(guard);
        picked
    });

    assert_eq!(worker.join().unwrap(), "memory");
}
