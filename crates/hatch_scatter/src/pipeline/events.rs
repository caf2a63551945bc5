//! Event types and sinks for observing pipeline runs.
//!
//! This module defines [`PipelineEvent`] and a set of sinks to emit, collect, or
//! forward events while executing a [`crate::pipeline::plan::Plan`] via
//! [`crate::pipeline::runner::PipelineRunner`] or
//! [`crate::pipeline::runner::run_plan`].
use glam::Vec2;

use crate::pipeline::plan::TechniqueKind;
use crate::pipeline::runner::{PassStats, RunStats};

/// Describes events emitted while running a plan.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// Technique of the plan.
        technique: TechniqueKind,
        /// Number of passes the plan will run.
        pass_count: usize,
        /// Field size in pixels (width, height).
        size_px: (usize, usize),
    },

    /// Emitted when a pass starts.
    PassStarted {
        /// Index of the pass in the plan.
        index: usize,
        /// Rotation applied to the field directions, in radians.
        orientation_offset: f32,
    },

    /// Emitted when a pass finishes.
    PassFinished {
        /// Summary of what the pass produced.
        stats: PassStats,
    },

    /// Emitted for every finished polyline, in pixel space.
    StrokeEmitted {
        /// Index of the pass that produced the stroke.
        pass_index: usize,
        /// The simplified or interpolated polyline.
        polyline: Vec<Vec2>,
    },

    /// Emitted when the whole plan finishes.
    RunFinished {
        /// Aggregated statistics of all passes.
        stats: RunStats,
    },

    /// Non-fatal warning generated during a run.
    Warning {
        /// Context string (e.g. pass index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PipelineEvent`], used by sinks to opt in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineEventKind {
    RunStarted,
    PassStarted,
    PassFinished,
    StrokeEmitted,
    RunFinished,
    Warning,
}

impl PipelineEvent {
    pub fn kind(&self) -> PipelineEventKind {
        match self {
            PipelineEvent::RunStarted { .. } => PipelineEventKind::RunStarted,
            PipelineEvent::PassStarted { .. } => PipelineEventKind::PassStarted,
            PipelineEvent::PassFinished { .. } => PipelineEventKind::PassFinished,
            PipelineEvent::StrokeEmitted { .. } => PipelineEventKind::StrokeEmitted,
            PipelineEvent::RunFinished { .. } => PipelineEventKind::RunFinished,
            PipelineEvent::Warning { .. } => PipelineEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PipelineEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PipelineEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: PipelineEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PipelineEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PipelineEvent) {}

    #[inline]
    fn wants(&self, _kind: PipelineEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PipelineEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PipelineEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PipelineEvent),
{
    #[inline]
    fn send(&mut self, event: PipelineEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PipelineEvent>,
    kinds: Option<Vec<PipelineEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            kinds: None,
        }
    }

    /// Collects only events of the given kinds.
    pub fn with_kinds(kinds: impl IntoIterator<Item = PipelineEventKind>) -> Self {
        Self {
            events: Vec::new(),
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<PipelineEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PipelineEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PipelineEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: PipelineEventKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PipelineEvent) {
        let kind = event.kind();
        let Some(last_idx) = self.sinks.iter().rposition(|s| s.wants(kind)) else {
            return;
        };
        for i in 0..last_idx {
            if self.sinks[i].wants(kind) {
                self.sinks[i].send(event.clone());
            }
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: PipelineEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
