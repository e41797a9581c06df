use std::path::PathBuf;
use std::time::Duration;

use catalog_core::{Effect, TurnLocator};
use catalog_engine::{
    build_markdown, EngineConfig, ExportWriter, HighlightStage, Highlighter, HostDocument,
    NodeHandle, Scheduler, StageTimer, Unscheduled,
};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};

/// Work deferred to a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Settle delay after a mutation elapsed; re-check bindings.
    Validate,
    Highlight(HighlightStage),
}

/// What running a batch of effects asks of the session.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EffectReport {
    pub render: bool,
    pub focused: Option<TurnLocator>,
    pub exported: Option<String>,
    /// The validation timer could not be armed; validate right away instead.
    pub validate_now: bool,
}

pub struct EffectRunner {
    highlighter: Highlighter,
    validation_delay: Duration,
    writer: Option<ExportWriter>,
}

impl EffectRunner {
    pub fn new(config: &EngineConfig, export_dir: Option<PathBuf>) -> Self {
        Self {
            highlighter: Highlighter::new(config.highlight.clone()),
            validation_delay: config.validation_delay(),
            writer: export_dir.map(ExportWriter::new),
        }
    }

    pub fn run<D, S>(&mut self, effects: Vec<Effect>, doc: &mut D, timers: &S) -> EffectReport
    where
        D: HostDocument,
        S: Scheduler<Deferred>,
    {
        let mut report = EffectReport::default();
        for effect in effects {
            match effect {
                Effect::RenderCatalog => report.render = true,
                Effect::ScheduleValidation => {
                    if timers
                        .schedule(self.validation_delay, Deferred::Validate)
                        .is_err()
                    {
                        report.validate_now = true;
                    }
                }
                Effect::FocusTurn { locator } => {
                    if self.focus(doc, timers, &locator) {
                        report.focused = Some(locator);
                    }
                }
                Effect::ExportSnapshot { snapshot } => {
                    let markdown = build_markdown(&snapshot);
                    if let Some(writer) = &self.writer {
                        if let Err(err) = writer.write_markdown(&snapshot.title, &markdown) {
                            engine_error!("Failed to write markdown export: {}", err);
                        }
                    }
                    report.exported = Some(markdown);
                }
                Effect::ExportUnavailable => {
                    engine_warn!("No conversation decoded yet; nothing to export");
                }
            }
        }
        report
    }

    /// Run a fired highlight stage and schedule its follow-up.
    pub fn advance_highlight<D, S>(&mut self, stage: HighlightStage, doc: &mut D, timers: &S)
    where
        D: HostDocument,
        S: Scheduler<Deferred>,
    {
        if let Some(next) = self.highlighter.advance(doc, stage) {
            self.schedule_stage(next, doc, timers);
        }
    }

    fn focus<D, S>(&mut self, doc: &mut D, timers: &S, locator: &TurnLocator) -> bool
    where
        D: HostDocument,
        S: Scheduler<Deferred>,
    {
        let node = match doc.resolve(locator) {
            Ok(node) => node,
            Err(err) => {
                engine_warn!("Could not find turn element to focus: {}", err);
                return false;
            }
        };
        if let Err(err) = doc.scroll_into_view(node) {
            engine_warn!("Could not scroll to turn element: {}", err);
            return false;
        }
        self.highlight(node, doc, timers);
        engine_info!("Focused turn element {:?}", locator);
        true
    }

    fn highlight<D, S>(&mut self, node: NodeHandle, doc: &mut D, timers: &S)
    where
        D: HostDocument,
        S: Scheduler<Deferred>,
    {
        match self.highlighter.begin(doc, node) {
            Ok(timer) => self.schedule_stage(timer, doc, timers),
            Err(err) => engine_debug!("Scrolled without highlight: {}", err),
        }
    }

    /// Stages that cannot be timed run at once, so the element always gets
    /// its own style back.
    fn schedule_stage<D, S>(&mut self, mut timer: StageTimer, doc: &mut D, timers: &S)
    where
        D: HostDocument,
        S: Scheduler<Deferred>,
    {
        loop {
            let stage = match timers.schedule(timer.delay, Deferred::Highlight(timer.stage)) {
                Ok(()) => return,
                Err(Unscheduled {
                    task: Deferred::Highlight(stage),
                    ..
                }) => stage,
                Err(Unscheduled { .. }) => return,
            };
            match self.highlighter.advance(doc, stage) {
                Some(next) => timer = next,
                None => return,
            }
        }
    }
}
