// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reconciliation behaviour of timeline instances.

use cuetrack_core::{
    Action, CueContext, CueDescriptor, CueKind, CueObject, CuePayload, CueRegistry, NullSink,
    TimelineInstance, TimelineView,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Play(u32),
    Seek(u32),
    Stop(u32),
}

type Log = Arc<Mutex<Vec<(String, Call)>>>;

/// Cue that records every lifecycle call it receives
#[derive(Debug)]
struct Recorder {
    descriptor: Arc<CueDescriptor>,
    log: Log,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.log
            .lock()
            .unwrap()
            .push((self.descriptor.name().to_string(), call));
    }
}

impl CueObject for Recorder {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        self.record(Call::Play(ctx.current_frame()));
    }

    fn seek(&mut self, frame: u32, _ctx: &mut CueContext<'_>) {
        self.record(Call::Seek(frame));
    }

    fn stop(&mut self, ctx: &mut CueContext<'_>) {
        self.record(Call::Stop(ctx.current_frame()));
    }
}

fn recording_registry(log: &Log) -> Arc<CueRegistry> {
    let mut registry = CueRegistry::empty();
    let log = Arc::clone(log);
    registry.register(CueKind::Marker, move |descriptor| {
        Some(Box::new(Recorder {
            descriptor: Arc::clone(descriptor),
            log: Arc::clone(&log),
        }) as Box<dyn CueObject>)
    });
    Arc::new(registry)
}

fn marker(name: &str, start: u32, duration: u32) -> CueDescriptor {
    CueDescriptor::new(start, duration, CuePayload::Marker).with_name(name)
}

fn action(cues: Vec<CueDescriptor>) -> Arc<Action> {
    Arc::new(Action::from_descriptors("test", cues).unwrap())
}

fn live_names(instance: &TimelineInstance) -> Vec<String> {
    let mut names: Vec<_> = instance
        .live_cues()
        .map(|id| instance.action().cue(id).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

fn calls_at(log: &Log, from: usize) -> Vec<(String, Call)> {
    log.lock().unwrap()[from..].to_vec()
}

#[test]
fn boundary_handoff_stops_before_starting() {
    let log = Log::default();
    let mut instance = TimelineInstance::new(
        action(vec![marker("a", 0, 5), marker("b", 5, 5)]),
        recording_registry(&log),
    );

    for frame in 0..5 {
        instance.advance_to(frame, &mut NullSink);
        assert_eq!(live_names(&instance), ["a"], "frame {frame}");
    }

    let before = log.lock().unwrap().len();
    let report = instance.advance_to(5, &mut NullSink);
    assert_eq!(report.stopped.len(), 1);
    assert_eq!(report.started.len(), 1);
    assert_eq!(live_names(&instance), ["b"]);
    assert_eq!(
        calls_at(&log, before),
        [
            ("a".to_string(), Call::Stop(5)),
            ("b".to_string(), Call::Play(5)),
        ]
    );

    for frame in 6..10 {
        instance.advance_to(frame, &mut NullSink);
        assert_eq!(live_names(&instance), ["b"], "frame {frame}");
    }
    instance.advance_to(10, &mut NullSink);
    assert_eq!(instance.live_count(), 0);
}

#[test]
fn window_boundaries_are_exact() {
    let log = Log::default();
    let mut instance =
        TimelineInstance::new(action(vec![marker("x", 10, 5)]), recording_registry(&log));

    for frame in 0..20 {
        instance.advance_to(frame, &mut NullSink);
        assert_eq!(instance.live_count() == 1, (10..15).contains(&frame), "frame {frame}");
    }

    let calls = calls_at(&log, 0);
    assert_eq!(calls.first().map(|c| c.1), Some(Call::Play(10)));
    assert_eq!(calls.last().map(|c| c.1), Some(Call::Stop(15)));
    assert_eq!(calls.len(), 6);
}

#[test]
fn zero_duration_cue_never_materializes() {
    let log = Log::default();
    let mut instance =
        TimelineInstance::new(action(vec![marker("empty", 10, 0)]), recording_registry(&log));

    for frame in (0..20).chain((0..20).rev()) {
        let report = instance.advance_to(frame, &mut NullSink);
        assert!(!report.changed());
    }
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn repeated_frame_only_seeks() {
    let log = Log::default();
    let mut instance = TimelineInstance::new(
        action(vec![marker("a", 0, 8), marker("b", 2, 3)]),
        recording_registry(&log),
    );

    instance.advance_to(3, &mut NullSink);
    let before = log.lock().unwrap().len();
    let report = instance.advance_to(3, &mut NullSink);

    assert!(!report.changed());
    assert_eq!(report.seeked, 2);
    assert_eq!(
        calls_at(&log, before),
        [
            ("a".to_string(), Call::Seek(3)),
            ("b".to_string(), Call::Seek(3)),
        ]
    );
    instance.finish(&mut NullSink);
}

#[test]
fn seeking_back_matches_direct_simulation() {
    let cues = || {
        vec![
            marker("intro", 0, 4),
            marker("swing", 3, 6),
            marker("pulse", 7, 1),
            marker("tail", 9, 12),
            marker("empty", 5, 0),
        ]
    };
    let shared = action(cues());
    let registry = Arc::new(CueRegistry::default());
    const N: u32 = 24;

    for k in 0..=N {
        let mut direct = TimelineInstance::new(Arc::clone(&shared), Arc::clone(&registry));
        for frame in 0..=k {
            direct.advance_to(frame, &mut NullSink);
        }

        let mut scrubbed = TimelineInstance::new(Arc::clone(&shared), Arc::clone(&registry));
        for frame in 0..=N {
            scrubbed.advance_to(frame, &mut NullSink);
        }
        scrubbed.advance_to(k, &mut NullSink);

        assert_eq!(live_names(&scrubbed), live_names(&direct), "seek back to {k}");
        direct.finish(&mut NullSink);
        scrubbed.finish(&mut NullSink);
    }
}

#[test]
fn every_cue_follows_play_seek_stop() {
    let log = Log::default();
    let mut instance = TimelineInstance::new(
        action(vec![
            marker("a", 0, 6),
            marker("b", 4, 1),
            marker("c", 5, 10),
            marker("d", 12, 3),
        ]),
        recording_registry(&log),
    );

    let script = [0, 1, 2, 3, 4, 5, 9, 13, 13, 2, 4, 14, 7, 0, 20, 12];
    for frame in script {
        instance.advance_to(frame, &mut NullSink);
    }
    instance.reset(&mut NullSink);

    let mut active: HashMap<String, bool> = HashMap::new();
    for (name, call) in calls_at(&log, 0) {
        let is_active = active.entry(name.clone()).or_default();
        match call {
            Call::Play(_) => {
                assert!(!*is_active, "{name} played twice");
                *is_active = true;
            }
            Call::Seek(_) => assert!(*is_active, "{name} seeked before play"),
            Call::Stop(_) => {
                assert!(*is_active, "{name} stopped while inactive");
                *is_active = false;
            }
        }
    }
    assert!(active.values().all(|a| !a));
}

#[test]
fn reset_stops_each_live_cue_once() {
    let log = Log::default();
    let mut instance = TimelineInstance::new(
        action(vec![
            marker("a", 0, 10),
            marker("b", 2, 10),
            marker("c", 4, 10),
            marker("d", 30, 2),
        ]),
        recording_registry(&log),
    );
    for frame in 0..=6 {
        instance.advance_to(frame, &mut NullSink);
    }

    let before = log.lock().unwrap().len();
    let stopped = instance.reset(&mut NullSink);
    assert_eq!(stopped.len(), 3);
    assert_eq!(instance.live_count(), 0);
    assert_eq!(instance.current_frame(), 0);
    assert!(!instance.is_synchronized());

    let calls = calls_at(&log, before);
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|(_, call)| matches!(call, Call::Stop(_))));

    // Nothing left to stop
    assert!(instance.reset(&mut NullSink).is_empty());
    assert_eq!(log.lock().unwrap().len(), before + 3);
}

#[test]
fn restart_replays_from_zero() {
    let log = Log::default();
    let mut instance = TimelineInstance::new(
        action(vec![marker("a", 0, 10)]),
        recording_registry(&log),
    );
    instance.advance_to(0, &mut NullSink);
    instance.advance_to(4, &mut NullSink);

    let before = log.lock().unwrap().len();
    let report = instance.restart(&mut NullSink);
    assert_eq!(report.frame, 0);
    assert_eq!(report.stopped.len(), 1);
    assert_eq!(report.started.len(), 1);
    assert_eq!(
        calls_at(&log, before),
        [("a".to_string(), Call::Stop(4)), ("a".to_string(), Call::Play(0))]
    );
    instance.finish(&mut NullSink);
}

/// Cue whose context expires after its first seek
#[derive(Debug)]
struct OneSeek {
    descriptor: Arc<CueDescriptor>,
    seeks: u32,
    log: Log,
}

impl CueObject for OneSeek {
    fn descriptor(&self) -> &Arc<CueDescriptor> {
        &self.descriptor
    }

    fn play(&mut self, ctx: &mut CueContext<'_>) {
        self.log.lock().unwrap().push(("one".into(), Call::Play(ctx.current_frame())));
    }

    fn seek(&mut self, frame: u32, _ctx: &mut CueContext<'_>) {
        self.seeks += 1;
        self.log.lock().unwrap().push(("one".into(), Call::Seek(frame)));
    }

    fn stop(&mut self, ctx: &mut CueContext<'_>) {
        self.log.lock().unwrap().push(("one".into(), Call::Stop(ctx.current_frame())));
    }

    fn is_context_valid(&self, _timeline: TimelineView<'_>) -> bool {
        self.seeks == 0
    }
}

#[test]
fn cue_stopped_by_context_is_not_rebuilt_in_the_same_pass() {
    let log = Log::default();
    let mut registry = CueRegistry::empty();
    let factory_log = Arc::clone(&log);
    registry.register(CueKind::Marker, move |descriptor| {
        Some(Box::new(OneSeek {
            descriptor: Arc::clone(descriptor),
            seeks: 0,
            log: Arc::clone(&factory_log),
        }) as Box<dyn CueObject>)
    });
    let mut instance =
        TimelineInstance::new(action(vec![marker("one", 0, 10)]), Arc::new(registry));

    for frame in 0..4 {
        instance.advance_to(frame, &mut NullSink);
    }

    let calls: Vec<_> = calls_at(&log, 0).into_iter().map(|(_, call)| call).collect();
    assert_eq!(
        calls,
        [Call::Play(0), Call::Seek(1), Call::Stop(2), Call::Play(3)]
    );
    instance.finish(&mut NullSink);
}

#[test]
fn instances_share_one_action_across_threads() {
    let shared = action(vec![marker("a", 0, 5), marker("b", 3, 5)]);
    let registry = Arc::new(CueRegistry::default());

    std::thread::scope(|scope| {
        for offset in 0..4u32 {
            let shared = Arc::clone(&shared);
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                let mut instance = TimelineInstance::new(shared, registry);
                for frame in offset..offset + 6 {
                    instance.advance_to(frame, &mut NullSink);
                }
                let live = instance.live_count();
                instance.finish(&mut NullSink);
                live
            });
        }
    });
    assert_eq!(Arc::strong_count(&shared), 1);
}
