use std::path::PathBuf;
use std::time::Duration;

use catalog_core::{update, ApiKeyword, CatalogState, CatalogViewModel, Msg, TurnLocator};
use catalog_engine::{
    EngineConfig, HostDocument, ManualScheduler, MutationRecord, Scheduler, TimerHandle,
};
use engine_logging::{engine_debug, engine_warn};
use serde_json::Value;

use super::effects::{Deferred, EffectRunner};
use super::render::render;

/// One page session: owns the catalog store, the document and the timers.
///
/// Every inbound event is dispatched to completion before the next one is
/// taken, which is what keeps store mutations atomic without locking.
pub struct Session<D, S> {
    state: CatalogState,
    doc: D,
    timers: S,
    runner: EffectRunner,
    frames: Vec<String>,
    last_focus: Option<TurnLocator>,
    last_export: Option<String>,
}

impl<D, S> Session<D, S>
where
    D: HostDocument,
    S: Scheduler<Deferred>,
{
    pub fn new(doc: D, timers: S, config: &EngineConfig, export_dir: Option<PathBuf>) -> Self {
        Self {
            state: CatalogState::with_title(config.default_title.clone()),
            doc,
            timers,
            runner: EffectRunner::new(config, export_dir),
            frames: Vec::new(),
            last_focus: None,
            last_export: None,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn view(&self) -> CatalogViewModel {
        self.state.view()
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn timers(&self) -> &S {
        &self.timers
    }

    /// Catalog panels rendered so far, oldest first.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last_focus(&self) -> Option<&TurnLocator> {
        self.last_focus.as_ref()
    }

    pub fn last_export(&self) -> Option<&str> {
        self.last_export.as_deref()
    }

    /// Interceptor message carrying an already matched keyword.
    pub fn on_payload(&mut self, payload: Value, api_keyword: &str) {
        let scan = self.doc.scan();
        self.dispatch_msg(Msg::PayloadReceived {
            payload,
            api_keyword: api_keyword.to_string(),
            scan,
        });
    }

    /// Raw intercepted response; ignored unless the URL names a known operation.
    pub fn on_intercepted(&mut self, url: &str, payload: Value) {
        match ApiKeyword::match_url(url) {
            Some(keyword) => self.on_payload(payload, keyword.as_str()),
            None => engine_debug!("Ignoring response from unrelated request {}", url),
        }
    }

    /// Mutate the document the way the host page would, then notify.
    pub fn mutate_document<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut D) -> MutationRecord,
    {
        let record = mutate(&mut self.doc);
        self.on_mutation(record);
    }

    pub fn on_mutation(&mut self, record: MutationRecord) {
        self.dispatch_msg(Msg::DocumentMutated {
            removed_turns: record.removed_turns,
        });
    }

    pub fn on_toggle(&mut self, show: Option<bool>) {
        self.dispatch_msg(Msg::CatalogToggled { show });
    }

    pub fn on_activate(&mut self, turn_index: usize) {
        let scan = self.doc.scan();
        self.dispatch_msg(Msg::PromptActivated { turn_index, scan });
    }

    pub fn on_export(&mut self) {
        self.dispatch_msg(Msg::ExportRequested);
    }

    pub fn on_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::Validate => {
                let scan = self.doc.scan();
                self.dispatch_msg(Msg::ValidationDue { scan });
            }
            Deferred::Highlight(stage) => {
                self.runner
                    .advance_highlight(stage, &mut self.doc, &self.timers);
            }
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        let report = self.runner.run(effects, &mut self.doc, &self.timers);
        if report.render {
            self.enqueue_render();
        } else if was_dirty {
            engine_debug!("Catalog changed while hidden");
        }
        if let Some(locator) = report.focused {
            self.last_focus = Some(locator);
        }
        if let Some(markdown) = report.exported {
            self.last_export = Some(markdown);
        }
        if report.validate_now {
            engine_warn!("Validation timer unavailable; validating immediately");
            self.on_deferred(Deferred::Validate);
        }
    }

    fn enqueue_render(&mut self) {
        self.frames.push(render(&self.state.view()));
    }
}

impl<D: HostDocument> Session<D, ManualScheduler<Deferred>> {
    /// Move virtual time forward, firing every deferred task that comes due,
    /// including follow-ups scheduled along the way.
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some(task) = self.timers.pop_due(until) {
            self.on_deferred(task);
        }
        self.timers.settle(until);
    }
}

impl<D: HostDocument> Session<D, TimerHandle<Deferred>> {
    /// Handle fired timers until none are pending. Gives up when nothing
    /// fires within `idle`.
    pub fn drain_timers(&mut self, idle: Duration) {
        while self.timers.pending() > 0 {
            match self.timers.recv_timeout(idle) {
                Some(task) => self.on_deferred(task),
                None => {
                    engine_warn!(
                        "{} deferred task(s) still pending after {:?}",
                        self.timers.pending(),
                        idle
                    );
                    break;
                }
            }
        }
    }
}
